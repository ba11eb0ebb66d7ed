// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 3W (Who, What, Where) reference data and activity records.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A state, top level of the location hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// A county and the id of the state it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    pub id: u64,
    pub name: String,
    /// Owning state id
    pub state: u64,
}

/// A humanitarian sector (cluster).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "color")]
    pub color_code: Option<String>,
}

/// One operational presence record: an organization active in a sector at
/// a county for a given year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalPresence {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "organization_name")]
    pub organization: String,
    #[serde(rename = "sector_name")]
    pub sector: String,
    #[serde(default)]
    pub sector_color: Option<String>,
    #[serde(rename = "state_name")]
    pub state: String,
    #[serde(rename = "county_name")]
    pub county: String,
    pub year: i32,
    /// Number of projects/activities; absent counts as zero
    #[serde(default)]
    pub presence_count: Option<u32>,
    #[serde(default)]
    pub notes: String,
}

/// 3W submission from the member area.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPresence {
    pub county: u64,
    pub sector: u64,
    #[validate(range(min = 2010, max = 2030))]
    pub year: i32,
    #[serde(default)]
    pub beneficiaries: u32,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub activities_description: String,
}
