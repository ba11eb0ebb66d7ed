// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Default backend REST API base path.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Where callers are sent when their session cannot be recovered.
pub const DEFAULT_LOGIN_PATH: &str = "/portal/login";

/// Largest file accepted for logo and document uploads (15 MB).
pub const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend REST API base URL, without trailing slash
    pub api_url: String,
    /// Browser-facing origin (CORS and cookie `Secure` flag)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Login entry point for redirects
    pub login_path: String,
    /// Timeout applied to every upstream call
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("API_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid("API_URL", api_url));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => 3000,
        };

        let timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS", raw))?,
            Err(_) => 30,
        };

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port,
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Config for tests with local defaults.
    pub fn test_default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 3000,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Cookies are marked `Secure` unless the frontend is served over plain HTTP.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("API_URL", "https://api.example.org/api/");
        env::set_var("PORT", "8081");
        env::remove_var("LOGIN_PATH");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_url, "https://api.example.org/api");
        assert_eq!(config.port, 8081);
        assert_eq!(config.login_path, DEFAULT_LOGIN_PATH);

        env::set_var("API_URL", "ftp://nope");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("API_URL", _))
        ));

        env::remove_var("API_URL");
        env::remove_var("PORT");
    }

    #[test]
    fn test_secure_cookies_follow_frontend_scheme() {
        let mut config = Config::test_default();
        assert!(!config.secure_cookies());

        config.frontend_url = "https://nngoforum.org".to_string();
        assert!(config.secure_cookies());
    }
}
