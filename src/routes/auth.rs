// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, logout and session status routes.

use axum::{extract::State, routing::get, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::SessionHandle;
use crate::services::PortalService;
use crate::session::{evaluator::decode_unverified, Claims};
use crate::time_utils::{format_utc_rfc3339, from_unix_seconds};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session_status))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Identity shown in the portal header. Decoded, not verified.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionUser {
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub user_id: Option<u64>,
    pub email: Option<String>,
    pub expires_at: Option<String>,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            expires_at: from_unix_seconds(claims.exp).map(format_utc_rfc3339),
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub authenticated: bool,
    /// An expired access token can still be renewed
    pub can_refresh: bool,
    pub user: Option<SessionUser>,
}

impl SessionResponse {
    fn signed_out() -> Self {
        Self {
            authenticated: false,
            can_refresh: false,
            user: None,
        }
    }
}

/// Exchange credentials for a token pair held in cookies.
async fn login(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionResponse>> {
    form.validate()?;

    let client = state.api_client(session.store());
    let pair = PortalService::new(&client)
        .login(&form.username, &form.password)
        .await?;

    let user = decode_unverified(&pair.access).ok().map(SessionUser::from);
    Ok(Json(SessionResponse {
        authenticated: true,
        can_refresh: true,
        user,
    }))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Json<SessionResponse> {
    let client = state.api_client(session.store());
    PortalService::new(&client).logout();
    tracing::info!("Member signed out");
    Json(SessionResponse::signed_out())
}

async fn session_status(Extension(session): Extension<SessionHandle>) -> Json<SessionResponse> {
    let evaluator = session.evaluator();
    let authenticated = evaluator.is_valid();
    let can_refresh = session.store().refresh_token().is_some();
    let user = evaluator
        .current_user()
        .filter(|_| authenticated)
        .map(SessionUser::from);

    Json(SessionResponse {
        authenticated,
        can_refresh,
        user,
    })
}
