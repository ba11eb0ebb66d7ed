// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public pages: landing counts, directory listings, member profiles, FAQs
//! and the forum.
//!
//! Every handler here calls the backend through the anonymous client, so a
//! visitor's session cookies are never sent, refreshed or cleared.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Collection, ForumCategory, LandingStats, ListPage};
use crate::services::PortalService;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(landing_stats))
        .route("/public/{collection}", get(public_listing))
        .route("/members/{slug}", get(member_profile))
        .route("/faqs", get(faqs))
        .route("/forum/categories", get(forum_categories))
        .route("/forum/posts", get(forum_posts))
}

/// Query parameters are forwarded to the backend unchanged (search,
/// filters, page).
type ForwardedQuery = Query<Vec<(String, String)>>;

async fn landing_stats(State(state): State<Arc<AppState>>) -> Json<LandingStats> {
    let client = state.public_client();
    Json(PortalService::new(&client).landing_stats().await)
}

async fn public_listing(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Query(query): ForwardedQuery,
) -> Result<Json<ListPage<Value>>> {
    let collection: Collection = collection.parse().map_err(AppError::NotFound)?;
    let client = state.public_client();
    let page = PortalService::new(&client)
        .public_listing(collection, &query)
        .await?;
    Ok(Json(page))
}

async fn member_profile(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let client = state.public_client();
    PortalService::new(&client)
        .member_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", slug)))
}

async fn faqs(State(state): State<Arc<AppState>>) -> Result<Json<ListPage<Value>>> {
    let client = state.public_client();
    Ok(Json(PortalService::new(&client).faqs().await?))
}

async fn forum_categories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ForumCategory>>> {
    let client = state.public_client();
    Ok(Json(PortalService::new(&client).forum_categories().await?))
}

async fn forum_posts(
    State(state): State<Arc<AppState>>,
    Query(query): ForwardedQuery,
) -> Result<Json<ListPage<Value>>> {
    let client = state.public_client();
    let page = PortalService::new(&client)
        .public_forum_posts(&query)
        .await?;
    Ok(Json(page))
}
