// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 3W (Who, What, Where) dashboard route.
//!
//! The dashboard is public: it reads through the anonymous client and any
//! backend failure, a 401 included, degrades the view instead of redirecting.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{County, Sector, State as AdminState};
use crate::services::ThreeWService;
use crate::threew::{CommitOutcome, CountyGroup, FilterSelection, Summary, ThreeWView};
use crate::time_utils::recent_years;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tools/3w", get(three_w))
}

#[derive(Debug, Default, Deserialize)]
pub struct ThreeWParams {
    pub year: Option<i32>,
    pub state: Option<u64>,
    pub county: Option<u64>,
    pub sector: Option<u64>,
}

#[derive(Serialize)]
pub struct ThreeWResponse<'a> {
    /// Selection actually applied; an out-of-state county is dropped
    pub selection: &'a FilterSelection,
    pub states: &'a [AdminState],
    pub counties: Vec<&'a County>,
    pub sectors: &'a [Sector],
    pub years: Vec<i32>,
    pub summary: Summary,
    pub groups: Vec<CountyRow<'a>>,
    pub markers: geojson::FeatureCollection,
    /// Records could not be fetched; counts are zero
    pub degraded: bool,
}

/// One county group as listed beside the map.
#[derive(Serialize)]
pub struct CountyRow<'a> {
    pub state: &'a str,
    pub county: &'a str,
    pub activities: usize,
    pub radius: u32,
    pub sectors: IndexMap<&'a str, u32>,
}

impl<'a> From<CountyGroup<'a>> for CountyRow<'a> {
    fn from(group: CountyGroup<'a>) -> Self {
        Self {
            state: group.state,
            county: group.county,
            activities: group.activities(),
            radius: group.radius(),
            sectors: group.sectors,
        }
    }
}

async fn three_w(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ThreeWParams>,
) -> Result<Json<serde_json::Value>> {
    let client = state.public_client();
    let service = ThreeWService::new(&client);
    let mut view = ThreeWView::new();

    view.apply_reference(service.fetch_reference().await);

    view.select_year(params.year);
    view.select_sector(params.sector);
    view.select_state(params.state);
    let ticket = match view.select_county(params.county) {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring county filter");
            view.begin_fetch()
        }
    };

    let records = service.fetch_records(&ticket.selection).await;
    let outcome = view.commit(&ticket, records);

    let response = ThreeWResponse {
        selection: view.selection(),
        states: view.states(),
        counties: view.available_counties(),
        sectors: view.sectors(),
        years: recent_years(chrono::Utc::now()),
        summary: view.summary(),
        groups: view.groups().into_iter().map(CountyRow::from).collect(),
        markers: view.markers(),
        degraded: outcome != CommitOutcome::Applied,
    };

    // Borrowed view data is serialized before the view goes out of scope.
    let body = serde_json::to_value(&response).map_err(anyhow::Error::from)?;
    Ok(Json(body))
}
