// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state: token storage and client-side validity checks.

pub mod cookie;
pub mod evaluator;
pub mod store;

pub use cookie::CookieTokenStore;
pub use evaluator::{Claims, SessionEvaluator};
pub use store::{MemoryTokenStore, TokenPair, TokenStore};
