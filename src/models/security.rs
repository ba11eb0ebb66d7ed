// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security incident reports (6W framework).

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentType {
    #[default]
    SecurityIncident,
    Theft,
    Assault,
    Kidnapping,
    ArmedConflict,
    Other,
}

/// Incident report: who, where, when, what happened, what was done, what
/// is needed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SecurityIncidentReport {
    #[serde(default)]
    pub incident_type: IncidentType,
    #[validate(length(min = 1, max = 500))]
    pub who_involved: String,
    #[validate(length(min = 1, max = 255))]
    pub where_location: String,
    #[validate(length(min = 1, max = 64))]
    pub when_date_time: String,
    #[validate(length(min = 1))]
    pub what_happened: String,
    #[validate(length(min = 1))]
    pub what_you_did: String,
    #[validate(length(min = 1))]
    pub what_you_need: String,
    #[serde(default)]
    pub immediate_needs: String,
}
