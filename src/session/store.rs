// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token storage abstraction.
//!
//! The store only persists strings. It never inspects token contents; expiry
//! of the *claims* is the session evaluator's job, expiry of the *storage
//! entry* is the store's.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Storage lifetime of the access token entry.
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 7;
/// Storage lifetime of the refresh token entry.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Access/refresh token pair as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Persistent storage for the session's token pair.
///
/// Implementations use interior mutability: a store is shared between the
/// API client and the request handler for the lifetime of a session.
pub trait TokenStore: Send + Sync {
    /// Persist both tokens, restarting both storage lifetimes.
    fn save(&self, access: &str, refresh: &str);

    /// Current access token, if set and not past its storage lifetime.
    fn access_token(&self) -> Option<String>;

    /// Current refresh token, if set and not past its storage lifetime.
    fn refresh_token(&self) -> Option<String>;

    /// Remove both tokens.
    fn clear(&self);
}

#[derive(Debug, Clone)]
struct StoredToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredToken {
    fn live_value(&self, now: DateTime<Utc>) -> Option<String> {
        (now < self.expires_at).then(|| self.value.clone())
    }
}

#[derive(Debug, Default)]
struct Slots {
    access: Option<StoredToken>,
    refresh: Option<StoredToken>,
}

/// In-process token store with the same lifetimes as the cookie store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slots: Mutex<Slots>,
}

impl MemoryTokenStore {
    /// Start with an empty store.
    pub fn init() -> Self {
        Self::default()
    }

    /// Save with an explicit issue time.
    pub fn save_at(&self, access: &str, refresh: &str, now: DateTime<Utc>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.access = Some(StoredToken {
            value: access.to_string(),
            expires_at: now + Duration::days(ACCESS_TOKEN_TTL_DAYS),
        });
        slots.refresh = Some(StoredToken {
            value: refresh.to_string(),
            expires_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
        });
    }

    pub fn access_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.access.as_ref().and_then(|t| t.live_value(now))
    }

    pub fn refresh_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.refresh.as_ref().and_then(|t| t.live_value(now))
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, access: &str, refresh: &str) {
        self.save_at(access, refresh, Utc::now());
    }

    fn access_token(&self) -> Option<String> {
        self.access_token_at(Utc::now())
    }

    fn refresh_token(&self) -> Option<String> {
        self.refresh_token_at(Utc::now())
    }

    fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        *slots = Slots::default();
    }
}
