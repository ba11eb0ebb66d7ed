// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookie-backed token store.

use super::store::{TokenStore, ACCESS_TOKEN_TTL_DAYS, REFRESH_TOKEN_TTL_DAYS};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::{Mutex, PoisonError};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Token store over the request's cookie jar.
///
/// Writes accumulate as jar deltas; the session middleware emits them as
/// `Set-Cookie` headers once the handler is done. Storage expiry is the
/// browser's job via `Max-Age`.
#[derive(Debug)]
pub struct CookieTokenStore {
    jar: Mutex<CookieJar>,
    secure: bool,
}

impl CookieTokenStore {
    /// Wrap the cookies sent with the current request.
    pub fn init(jar: CookieJar, secure: bool) -> Self {
        Self {
            jar: Mutex::new(jar),
            secure,
        }
    }

    /// Snapshot of the jar including pending changes.
    pub fn jar(&self) -> CookieJar {
        self.jar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn token_cookie(&self, name: &'static str, value: String, days: i64) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::days(days))
            .build()
    }

    fn read(&self, name: &str) -> Option<String> {
        let jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        jar.get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Removal cookies for both tokens, matching the attributes they were set with.
pub fn removal_cookies() -> [Cookie<'static>; 2] {
    [
        Cookie::build(ACCESS_COOKIE).path("/").build(),
        Cookie::build(REFRESH_COOKIE).path("/").build(),
    ]
}

impl TokenStore for CookieTokenStore {
    fn save(&self, access: &str, refresh: &str) {
        let access = self.token_cookie(ACCESS_COOKIE, access.to_string(), ACCESS_TOKEN_TTL_DAYS);
        let refresh =
            self.token_cookie(REFRESH_COOKIE, refresh.to_string(), REFRESH_TOKEN_TTL_DAYS);

        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        *jar = jar.clone().add(access).add(refresh);
    }

    fn access_token(&self) -> Option<String> {
        self.read(ACCESS_COOKIE)
    }

    fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_COOKIE)
    }

    fn clear(&self) {
        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = jar.clone();
        for cookie in removal_cookies() {
            next = next.remove(cookie);
        }
        *jar = next;
    }
}
