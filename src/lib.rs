// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! NNGO Portal: server side of the National NGO Forum member portal.
//!
//! Holds the session tokens in cookies, talks to the backend REST API with a
//! single refresh-and-retry on expired access tokens, and serves the 3W
//! (Who, What, Where) operational presence view.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod threew;
pub mod time_utils;

use config::Config;
use services::ApiClient;
use session::TokenStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Connection pool shared by every session's API client
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// API client bound to one session's token store.
    pub fn api_client(&self, store: Arc<dyn TokenStore>) -> ApiClient {
        ApiClient::new(
            self.http.clone(),
            self.config.api_url.clone(),
            self.config.login_path.clone(),
            store,
        )
    }

    /// Token-less client for the public pages and the 3W dashboard.
    pub fn public_client(&self) -> ApiClient {
        ApiClient::anonymous(
            self.http.clone(),
            self.config.api_url.clone(),
            self.config.login_path.clone(),
        )
    }
}
