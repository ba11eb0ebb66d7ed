// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side session validity checks.
//!
//! Claims are decoded without verifying the signature. The backend remains
//! the authority on every request; the result here only decides whether to
//! show member pages or send the user to the login page.

use super::store::TokenStore;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Access token claims as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Backend user id (subject)
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The only claim validity depends on.
#[derive(Debug, Deserialize)]
struct Expiry {
    exp: i64,
}

/// Whether `exp` lies strictly after `now`, compared in milliseconds.
fn live_at(exp: i64, now: DateTime<Utc>) -> bool {
    exp.saturating_mul(1000) > now.timestamp_millis()
}

fn decode_payload<T: DeserializeOwned>(token: &str) -> Result<T, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<T>(token, &DecodingKey::from_secret(&[]), &validation).map(|data| data.claims)
}

/// Decode a token payload without signature or expiry validation.
pub fn decode_unverified(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode_payload(token)
}

/// Read-only view of the session held in a token store.
pub struct SessionEvaluator<'a> {
    store: &'a dyn TokenStore,
}

impl<'a> SessionEvaluator<'a> {
    pub fn new(store: &'a dyn TokenStore) -> Self {
        Self { store }
    }

    /// True iff an access token is stored, has a numeric `exp`, and has not
    /// expired. Other claims may have any shape.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let Some(token) = self.store.access_token() else {
            return false;
        };
        match decode_payload::<Expiry>(&token) {
            Ok(expiry) => live_at(expiry.exp, now),
            Err(e) => {
                tracing::debug!(error = %e, "Stored access token has no usable expiry");
                false
            }
        }
    }

    /// Decoded claims for display. Never use for authorization.
    pub fn current_user(&self) -> Option<Claims> {
        let token = self.store.access_token()?;
        match decode_unverified(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "Stored access token is malformed");
                None
            }
        }
    }
}
