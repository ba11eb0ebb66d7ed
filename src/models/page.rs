// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated list envelopes.

use serde::{Deserialize, Serialize};

/// Normalized list page returned to the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub results: Vec<T>,
    pub count: u64,
}

/// List endpoints answer `{results, count}`; a few answer a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Page {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_page(self) -> ListPage<T> {
        match self {
            ListResponse::Page { results, count } => {
                let count = count.unwrap_or(results.len() as u64);
                ListPage { results, count }
            }
            ListResponse::Bare(results) => ListPage {
                count: results.len() as u64,
                results,
            },
        }
    }

    pub fn into_results(self) -> Vec<T> {
        self.into_page().results
    }
}

/// Headline counts on the landing page. A count that could not be
/// fetched is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingStats {
    pub members: u64,
    pub operational_presence: u64,
    pub events: u64,
    pub resources: u64,
}
