// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend REST API client.
//!
//! Every call to the backend goes through [`ApiClient::send`], which attaches
//! the stored access token and runs the refresh protocol:
//! - a 401 on the first attempt triggers exactly one refresh
//! - a successful refresh resends the request once and accepts the result
//! - a failed refresh clears the token store and ends the session
//!
//! Public pages use an anonymous client ([`ApiClient::anonymous`]) that sends
//! no token and returns a 401 like any other status.

use crate::config::MAX_UPLOAD_BYTES;
use crate::session::{MemoryTokenStore, TokenPair, TokenStore};
use reqwest::{multipart, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of an outgoing request, kept in a form that can be sent twice.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// Description of a backend call. Rebuilt into a fresh HTTP request for
/// every attempt.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Multipart form fields, cloneable so a retry can rebuild the form.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<MultipartField>,
}

#[derive(Debug, Clone)]
enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        upload: Upload,
    },
}

/// A file received from the browser, ready to forward upstream.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(MultipartField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a file field. Files over the upload limit are refused here,
    /// before anything reaches the backend.
    pub fn file(mut self, name: impl Into<String>, upload: Upload) -> Result<Self, ClientError> {
        if upload.data.len() > MAX_UPLOAD_BYTES {
            return Err(ClientError::UploadTooLarge {
                size: upload.data.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }
        self.fields.push(MultipartField::File {
            name: name.into(),
            upload,
        });
        Ok(self)
    }

    fn build(&self) -> Result<multipart::Form, ClientError> {
        let mut form = multipart::Form::new();
        for field in &self.fields {
            form = match field {
                MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartField::File { name, upload } => {
                    let mut part = multipart::Part::bytes(upload.data.clone())
                        .file_name(upload.file_name.clone());
                    if let Some(mime) = &upload.content_type {
                        part = part.mime_str(mime)?;
                    }
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// A completed HTTP exchange with the backend.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Non-success statuses become [`ClientError::Status`] with the body intact.
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Status {
                status: self.status,
                body: self.text(),
            })
        }
    }

    /// Decode a success body as JSON.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let ok = self.error_for_status()?;
        Ok(serde_json::from_slice(&ok.body)?)
    }
}

/// Which send of the originating request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    /// The resend after a successful refresh. Never refreshes again.
    Retry,
}

/// Progress of one originating request through the refresh protocol.
#[derive(Debug)]
pub enum RequestState {
    Attempting(Attempt),
    RefreshingOnce,
    Succeeded(ApiResponse),
    FailedTerminal(RefreshError),
}

impl RequestState {
    /// Next state after an attempt completed with `response`.
    fn after_attempt(attempt: Attempt, response: ApiResponse) -> Self {
        match attempt {
            Attempt::Initial if response.status == StatusCode::UNAUTHORIZED => {
                RequestState::RefreshingOnce
            }
            _ => RequestState::Succeeded(response),
        }
    }
}

/// Why the session could not be recovered.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("No refresh token stored")]
    MissingRefreshToken,

    #[error("Refresh rejected with HTTP {status}")]
    Rejected { status: StatusCode, body: String },

    #[error("Refresh request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Malformed refresh response: {0}")]
    Malformed(String),
}

/// Errors surfaced to callers of the API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Authorization failed and could not be recovered. The caller should
    /// send the user to `login_path`.
    #[error("Session expired: {source}")]
    SessionExpired {
        login_path: String,
        source: RefreshError,
    },

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    UploadTooLarge { size: usize, limit: usize },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Backend API client bound to one session's token store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    store: Arc<dyn TokenStore>,
    /// Run the refresh protocol on a 401
    refreshes: bool,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        login_path: impl Into<String>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            login_path: login_path.into(),
            store,
            refreshes: true,
        }
    }

    /// Client for public endpoints. Sends no bearer token and never
    /// refreshes, so a visitor's cookies are neither used nor cleared.
    pub fn anonymous(
        http: reqwest::Client,
        base_url: impl Into<String>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            refreshes: false,
            ..Self::new(http, base_url, login_path, Arc::new(MemoryTokenStore::init()))
        }
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request through the refresh protocol.
    ///
    /// Any completed exchange other than an unrecovered 401 is returned as
    /// `Ok`, whatever its status. Transport errors are returned untouched.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut state = RequestState::Attempting(Attempt::Initial);
        loop {
            state = match state {
                RequestState::Attempting(attempt) => {
                    let response = self.dispatch(request).await?;
                    if self.refreshes {
                        RequestState::after_attempt(attempt, response)
                    } else {
                        RequestState::Succeeded(response)
                    }
                }
                RequestState::RefreshingOnce => {
                    tracing::debug!(path = %request.path, "Access token rejected, refreshing");
                    match self.refresh_access_token().await {
                        Ok(()) => RequestState::Attempting(Attempt::Retry),
                        Err(e) => {
                            tracing::warn!(error = %e, "Token refresh failed, clearing session");
                            self.store.clear();
                            RequestState::FailedTerminal(e)
                        }
                    }
                }
                RequestState::Succeeded(response) => return Ok(response),
                RequestState::FailedTerminal(source) => {
                    return Err(ClientError::SessionExpired {
                        login_path: self.login_path.clone(),
                        source,
                    })
                }
            };
        }
    }

    /// Send and decode a successful JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ClientError> {
        self.send(request).await?.json()
    }

    /// One HTTP round-trip with the currently stored access token.
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = self.store.access_token() {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.build()?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "Backend call completed"
        );

        Ok(ApiResponse { status, body })
    }

    /// Exchange the stored refresh token for a new access token.
    async fn refresh_access_token(&self) -> Result<(), RefreshError> {
        let refresh = self
            .store
            .refresh_token()
            .ok_or(RefreshError::MissingRefreshToken)?;

        let response = self
            .http
            .post(self.url("token/refresh/"))
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(RefreshError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefreshError::Rejected { status, body });
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| RefreshError::Malformed(e.to_string()))?;

        self.store.save(&refreshed.access, &refresh);
        tracing::info!("Access token refreshed");
        Ok(())
    }

    /// Obtain a fresh token pair with credentials and store it.
    ///
    /// Bypasses the refresh protocol: a 401 here means wrong credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ClientError> {
        let response = self
            .http
            .post(self.url("token/"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        let pair: TokenPair = ApiResponse { status, body }.json()?;

        self.store.save(&pair.access, &pair.refresh);
        Ok(pair)
    }
}
