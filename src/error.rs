// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::api_client::ClientError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    /// Refresh failed; the browser is sent to the login page.
    #[error("Session expired")]
    SessionExpired { login_path: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Upload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// Backend answered with an error status; passed through verbatim.
    #[error("Backend returned HTTP {status}")]
    Upstream { status: StatusCode, body: String },

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::SessionExpired { login_path, .. } => AppError::SessionExpired { login_path },
            ClientError::Status { status, body } => AppError::Upstream { status, body },
            ClientError::UploadTooLarge { size, .. } => AppError::PayloadTooLarge(size),
            ClientError::Transport(e) => AppError::BackendUnavailable(e.to_string()),
            ClientError::Json(e) => {
                AppError::BackendUnavailable(format!("unexpected response: {}", e))
            }
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::SessionExpired { login_path } => {
                tracing::info!(login_path = %login_path, "Session expired, redirecting to login");
                return Redirect::to(&login_path).into_response();
            }
            AppError::Upstream { status, body } => {
                return (status, [(header::CONTENT_TYPE, "application/json")], body)
                    .into_response();
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.into())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(msg.into())),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                serde_json::to_value(errors.field_errors()).ok(),
            ),
            AppError::PayloadTooLarge(size) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                Some(format!("{} bytes exceeds the 15 MB limit", size).into()),
            ),
            AppError::BackendUnavailable(msg) => {
                tracing::error!(error = %msg, "Backend call failed");
                (StatusCode::BAD_GATEWAY, "backend_unavailable", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
