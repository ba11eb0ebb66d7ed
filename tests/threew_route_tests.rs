// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 3W dashboard route tests against the mock backend's fixture records.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

use common::MockOptions;

async fn three_w(app: axum::Router, query: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/tools/3w{query}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_unfiltered_view() {
    let backend = common::spawn_backend(MockOptions::default()).await;
    let (app, _) = common::create_test_app(&backend.api_url);

    let (status, body) = three_w(app, "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["summary"],
        json!({
            "total_activities": 4,
            "unique_organizations": 2,
            "unique_locations": 3,
            "total_presence": 18
        })
    );
    assert_eq!(body["states"].as_array().unwrap().len(), 2);
    assert_eq!(body["counties"].as_array().unwrap().len(), 3);
    assert_eq!(body["sectors"].as_array().unwrap().len(), 2);
    assert_eq!(body["years"].as_array().unwrap().len(), 10);
    assert_eq!(body["degraded"], false);
    assert_eq!(body["selection"], json!({}));
}

#[tokio::test]
async fn test_state_filter_matches_worked_example() {
    let backend = common::spawn_backend(MockOptions::default()).await;
    let (app, _) = common::create_test_app(&backend.api_url);

    let (status, body) = three_w(app, "?state=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["summary"],
        json!({
            "total_activities": 3,
            "unique_organizations": 2,
            "unique_locations": 2,
            "total_presence": 18
        })
    );

    // Only Central Equatoria's counties are offered
    let counties: Vec<&str> = body["counties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(counties, ["Juba", "Yei"]);

    // Groups in first-seen order, sectors counted per group
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["county"], "Juba");
    assert_eq!(groups[0]["activities"], 2);
    assert_eq!(groups[0]["radius"], 9);
    assert_eq!(groups[0]["sectors"], json!({ "Health": 2 }));
    assert_eq!(groups[1]["county"], "Yei");

    let features = body["markers"]["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(
        features[0]["geometry"]["coordinates"],
        json!([31.5825, 4.8517])
    );
}

#[tokio::test]
async fn test_county_outside_state_dropped() {
    let backend = common::spawn_backend(MockOptions::default()).await;
    let (app, _) = common::create_test_app(&backend.api_url);

    // Juba (10) belongs to state 1, not 2
    let (status, body) = three_w(app, "?state=2&county=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"], json!({ "state": 2 }));
    assert_eq!(body["summary"]["total_activities"], 1);
    assert_eq!(body["groups"][0]["county"], "Torit");
}

#[tokio::test]
async fn test_year_and_sector_filters() {
    let backend = common::spawn_backend(MockOptions::default()).await;
    let (app, _) = common::create_test_app(&backend.api_url);

    let (_, body) = three_w(app, "?year=2026&sector=1").await;

    assert_eq!(body["selection"], json!({ "year": 2026, "sector": 1 }));
    assert_eq!(body["summary"]["total_activities"], 2);
    assert_eq!(body["summary"]["total_presence"], 5);
}

#[tokio::test]
async fn test_failed_reference_list_degrades_gracefully() {
    let backend = common::spawn_backend(MockOptions {
        fail_sectors: true,
        ..MockOptions::default()
    })
    .await;
    let (app, _) = common::create_test_app(&backend.api_url);

    let (status, body) = three_w(app, "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sectors"], json!([]));
    assert_eq!(body["states"].as_array().unwrap().len(), 2);
    assert_eq!(body["summary"]["total_activities"], 4);
}

#[tokio::test]
async fn test_unreachable_backend_yields_empty_view() {
    let api_url = common::closed_api_url().await;
    let (app, _) = common::create_test_app(&api_url);

    let (status, body) = three_w(app, "?state=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degraded"], true);
    assert_eq!(
        body["summary"],
        json!({
            "total_activities": 0,
            "unique_organizations": 0,
            "unique_locations": 0,
            "total_presence": 0
        })
    );
    assert_eq!(body["markers"]["features"], json!([]));
}

#[tokio::test]
async fn test_visitor_without_session_sees_all_members() {
    let backend = common::spawn_backend(MockOptions::default()).await;
    let (app, _) = common::create_test_app(&backend.api_url);

    let response = app
        .oneshot(Request::builder().uri("/tools/3w").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["degraded"], false);
    // Both organizations, not only the caller's own records
    assert_eq!(body["summary"]["unique_organizations"], 2);
    // No login-only endpoint was called
    assert_eq!(backend.counters.resources(), 0);
}

#[tokio::test]
async fn test_stale_member_cookies_neither_sent_nor_cleared() {
    let backend = common::spawn_backend(MockOptions::default()).await;
    let (app, _) = common::create_test_app(&backend.api_url);
    let cookie = format!(
        "access_token={}; refresh_token=revoked",
        common::mint_access_token(-3600)
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tools/3w?state=1")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(backend.counters.refreshes(), 0);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["summary"]["total_activities"], 3);
}
