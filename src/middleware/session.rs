// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-request token store and the member-area session guard.

use crate::session::{CookieTokenStore, SessionEvaluator, TokenStore};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// The request's token store, inserted into request extensions.
#[derive(Clone)]
pub struct SessionHandle(Arc<CookieTokenStore>);

impl SessionHandle {
    pub fn store(&self) -> Arc<dyn TokenStore> {
        self.0.clone()
    }

    pub fn evaluator(&self) -> SessionEvaluator<'_> {
        SessionEvaluator::new(self.0.as_ref())
    }
}

/// Wrap the request cookies in a token store for the handler, then emit
/// whatever the handler saved or cleared as `Set-Cookie` headers.
pub async fn attach_token_store(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let store = Arc::new(CookieTokenStore::init(jar, state.config.secure_cookies()));
    request
        .extensions_mut()
        .insert(SessionHandle(store.clone()));

    let response = next.run(request).await;
    (store.jar(), response).into_response()
}

/// Send visitors without a usable session to the login page.
///
/// An expired access token passes when a refresh token is stored; the API
/// client recovers it on the first backend call.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    request: Request,
    next: Next,
) -> Response {
    let valid = session.evaluator().is_valid();
    if !valid && session.store().refresh_token().is_none() {
        tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
        return Redirect::to(&state.config.login_path).into_response();
    }

    next.run(request).await
}
