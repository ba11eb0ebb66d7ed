// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// How many years the 3W year filter offers.
pub const YEAR_OPTIONS: i32 = 10;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert a JWT `exp`/`iat` value to a timestamp.
pub fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Year filter options: the current year and the nine before it, newest first.
pub fn recent_years(now: DateTime<Utc>) -> Vec<i32> {
    let current = now.year();
    (0..YEAR_OPTIONS).map(|i| current - i).collect()
}
