// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Summary statistics over a set of 3W records.

use crate::models::OperationalPresence;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Headline numbers shown above the 3W map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Summary {
    /// Number of records
    pub total_activities: u64,
    /// Distinct organization names
    pub unique_organizations: u64,
    /// Distinct (state, county) pairs
    pub unique_locations: u64,
    /// Sum of presence counts, absent counts as zero
    pub total_presence: u64,
}

pub fn aggregate(records: &[OperationalPresence]) -> Summary {
    let mut organizations = HashSet::new();
    let mut locations = HashSet::new();
    let mut total_presence = 0u64;

    for record in records {
        organizations.insert(record.organization.as_str());
        locations.insert((record.state.as_str(), record.county.as_str()));
        total_presence += u64::from(record.presence_count.unwrap_or(0));
    }

    Summary {
        total_activities: records.len() as u64,
        unique_organizations: organizations.len() as u64,
        unique_locations: locations.len() as u64,
        total_presence,
    }
}
