// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member postings (events, jobs, trainings, tenders, documents) and the
//! organization profile.
//!
//! Listing items coming back from the backend are passed through as JSON;
//! only the forms members submit are typed here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Publicly listable collections, mirrored under `/public/*` upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Members,
    Events,
    Jobs,
    Resources,
    Trainings,
    Tenders,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Members => "members",
            Collection::Events => "events",
            Collection::Jobs => "jobs",
            Collection::Resources => "resources",
            Collection::Trainings => "trainings",
            Collection::Tenders => "tenders",
        }
    }

    /// Unauthenticated listing path.
    pub fn public_path(&self) -> String {
        format!("/public/{}/", self.as_str())
    }

    /// Member-scoped path (the caller's own postings).
    pub fn member_path(&self) -> String {
        format!("/{}/", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "members" => Ok(Collection::Members),
            "events" => Ok(Collection::Events),
            "jobs" => Ok(Collection::Jobs),
            "resources" => Ok(Collection::Resources),
            "trainings" => Ok(Collection::Trainings),
            "tenders" => Ok(Collection::Tenders),
            other => Err(format!("Unknown collection: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewEvent {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// YYYY-MM-DD
    #[validate(length(min = 1))]
    pub event_date: String,
    #[serde(default)]
    pub event_time: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[serde(default)]
    pub venue: String,
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Consultant,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub requirements: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    #[validate(length(min = 1))]
    pub deadline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTraining {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[serde(default)]
    pub registration_deadline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTender {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub budget_range: String,
    #[validate(length(min = 1))]
    pub deadline: String,
}

/// Document metadata sent alongside an uploaded file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewResource {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Resource category id
    #[validate(length(min = 1))]
    pub category: String,
}

/// Organization profile fields editable by members.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl ProfileUpdate {
    /// Form fields in upload order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("website", self.website.clone().unwrap_or_default()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("address", self.address.clone()),
        ]
    }
}
