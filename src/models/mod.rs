// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod forum;
pub mod listing;
pub mod operational;
pub mod page;
pub mod security;

pub use forum::{ForumCategory, NewForumPost};
pub use listing::{
    Collection, JobType, NewEvent, NewJob, NewResource, NewTender, NewTraining, ProfileUpdate,
};
pub use operational::{County, NewPresence, OperationalPresence, Sector, State};
pub use page::{LandingStats, ListPage, ListResponse};
pub use security::{IncidentType, SecurityIncidentReport};
