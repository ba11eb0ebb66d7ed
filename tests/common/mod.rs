// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: an in-process mock of the backend REST API and a
//! router wired to it.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use nngo_portal::config::Config;
use nngo_portal::routes::create_router;
use nngo_portal::AppState;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Signing secret of the mock backend. The portal never sees it.
const BACKEND_SECRET: &[u8] = b"backend-signing-secret";

#[allow(dead_code)]
pub const USERNAME: &str = "member";
#[allow(dead_code)]
pub const PASSWORD: &str = "secret";
#[allow(dead_code)]
pub const VALID_REFRESH: &str = "refresh-1";

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    user_id: u64,
    email: String,
    exp: i64,
    iat: i64,
    token_type: String,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Mint an access token expiring `ttl_secs` from now (negative for expired).
#[allow(dead_code)]
pub fn mint_access_token(ttl_secs: i64) -> String {
    let now = now_secs();
    let claims = TokenClaims {
        user_id: 42,
        email: "info@hoperelief.org".to_string(),
        exp: now + ttl_secs,
        iat: now,
        token_type: "access".to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(BACKEND_SECRET),
    )
    .unwrap()
}

/// Behaviour switches for the mock backend.
#[derive(Debug, Clone, Copy)]
pub struct MockOptions {
    /// The refresh endpoint issues new access tokens
    pub refresh_succeeds: bool,
    /// Protected endpoints answer 401 whatever the token
    pub reject_all: bool,
    /// The sectors endpoint fails with 500
    pub fail_sectors: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            refresh_succeeds: true,
            reject_all: false,
            fail_sectors: false,
        }
    }
}

/// Call counters shared with the test.
#[derive(Debug, Default)]
pub struct Counters {
    pub resource_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
}

impl Counters {
    #[allow(dead_code)]
    pub fn resources(&self) -> usize {
        self.resource_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct MockState {
    options: MockOptions,
    counters: Arc<Counters>,
}

/// A running mock backend.
pub struct MockBackend {
    /// Base URL including the `/api` prefix
    pub api_url: String,
    pub counters: Arc<Counters>,
}

/// Spawn the mock backend on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_backend(options: MockOptions) -> MockBackend {
    let counters = Arc::new(Counters::default());
    let state = MockState {
        options,
        counters: counters.clone(),
    };

    let api = Router::new()
        .route("/token/", post(token))
        .route("/token/refresh/", post(token_refresh))
        .route("/profile/", get(profile).patch(update_profile))
        .route("/events/", get(own_events).post(create_event))
        .route("/jobs/", get(own_empty))
        .route("/trainings/", get(own_empty))
        .route("/tenders/", get(own_empty))
        .route("/resources/", get(own_empty).post(upload_resource))
        .route("/security/incidents/", post(create_incident))
        .route("/states/", get(states))
        .route("/counties/", get(counties))
        .route("/sectors/", get(sectors))
        .route("/operational-presence/", get(own_presence))
        .route("/public/operational-presence/", get(public_presence))
        .route("/public/{collection}/", get(public_listing))
        .route("/public/members/{slug}/", get(member))
        .route("/faqs/", get(faqs))
        .with_state(state);

    let app = Router::new().nest("/api", api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        api_url: format!("http://{}/api", addr),
        counters,
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_api_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

/// HTTP client for tests; bypasses any proxy configured in the environment.
#[allow(dead_code)]
pub fn test_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Create a test app pointed at the given backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(api_url: &str) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.api_url = api_url.to_string();
    let state = Arc::new(AppState {
        config,
        http: test_http_client(),
    });
    (create_router(state.clone()), state)
}

// ─── Mock handlers ───────────────────────────────────────────

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid"
        })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn token_valid(token: &str) -> bool {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(BACKEND_SECRET),
        &Validation::new(Algorithm::HS256),
    )
    .is_ok()
}

/// Count a protected call and check its bearer token.
fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    state.counters.resource_calls.fetch_add(1, Ordering::SeqCst);
    if state.options.reject_all {
        return false;
    }
    bearer(headers).is_some_and(token_valid)
}

/// Open endpoints still authenticate a bearer token when one is sent, so a
/// stale token gets 401 even where no login is needed.
fn stale_bearer(headers: &HeaderMap) -> bool {
    bearer(headers).is_some_and(|token| !token_valid(token))
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn token(State(state): State<MockState>, Json(creds): Json<Credentials>) -> Response {
    state.counters.login_calls.fetch_add(1, Ordering::SeqCst);
    if creds.username == USERNAME && creds.password == PASSWORD {
        Json(json!({ "access": mint_access_token(3600), "refresh": VALID_REFRESH }))
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "No active account found with the given credentials" })),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh: String,
}

async fn token_refresh(State(state): State<MockState>, Json(body): Json<RefreshBody>) -> Response {
    state.counters.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if state.options.refresh_succeeds && body.refresh == VALID_REFRESH {
        Json(json!({ "access": mint_access_token(3600) })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token is invalid or expired", "code": "token_not_valid" })),
        )
            .into_response()
    }
}

async fn profile(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(json!({ "name": "Hope Relief", "slug": "hope-relief" })).into_response()
}

/// Echo text fields and the logo size.
async fn update_profile(
    State(state): State<MockState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(read_mock_multipart(multipart).await).into_response()
}

async fn own_events(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(json!({ "results": [{ "id": 1, "title": "Coordination meeting" }], "count": 1 }))
        .into_response()
}

async fn own_empty(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(json!({ "results": [], "count": 0 })).into_response()
}

async fn create_event(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    if body["title"] == "reject" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "title": ["An event with this title already exists."] })),
        )
            .into_response();
    }
    let mut created = body;
    created["id"] = json!(99);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn create_incident(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    body["id"] = json!(7);
    body["status"] = json!("REPORTED");
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn upload_resource(
    State(state): State<MockState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    (StatusCode::CREATED, Json(read_mock_multipart(multipart).await)).into_response()
}

async fn read_mock_multipart(mut multipart: Multipart) -> Value {
    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(str::to_string) {
            let data = field.bytes().await.unwrap();
            fields.insert(format!("{name}_name"), json!(file_name));
            fields.insert(format!("{name}_size"), json!(data.len()));
        } else {
            fields.insert(name, json!(field.text().await.unwrap()));
        }
    }
    Value::Object(fields)
}

async fn states() -> Json<Value> {
    Json(json!({
        "results": [
            { "id": 1, "name": "Central Equatoria", "code": "CE" },
            { "id": 2, "name": "Eastern Equatoria", "code": "EE" }
        ],
        "count": 2
    }))
}

async fn counties() -> Json<Value> {
    Json(json!([
        { "id": 10, "name": "Juba", "state": 1 },
        { "id": 11, "name": "Yei", "state": 1 },
        { "id": 20, "name": "Torit", "state": 2 }
    ]))
}

async fn sectors(State(state): State<MockState>) -> Response {
    if state.options.fail_sectors {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "results": [
            { "id": 1, "name": "Health", "color_code": "#10b981" },
            { "id": 2, "name": "Education", "color_code": "#3b82f6" }
        ],
        "count": 2
    }))
    .into_response()
}

type PresenceRow = (&'static str, &'static str, &'static str, &'static str, i32, Option<u32>);

const PRESENCE: [PresenceRow; 4] = [
    ("Hope Relief", "Health", "Central Equatoria", "Juba", 2026, Some(5)),
    ("Hope Relief", "Education", "Central Equatoria", "Yei", 2026, Some(10)),
    ("Nile Aid", "Health", "Central Equatoria", "Juba", 2025, Some(3)),
    ("Nile Aid", "Health", "Eastern Equatoria", "Torit", 2026, None),
];

fn presence_json(r: &PresenceRow) -> Value {
    json!({
        "organization_name": r.0,
        "sector_name": r.1,
        "state_name": r.2,
        "county_name": r.3,
        "year": r.4,
        "presence_count": r.5,
    })
}

/// The calling member's own records; login required.
async fn own_presence(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let results: Vec<Value> = PRESENCE
        .iter()
        .filter(|r| r.0 == "Hope Relief")
        .map(presence_json)
        .collect();
    let count = results.len();
    Json(json!({ "results": results, "count": count })).into_response()
}

/// Every member's records, open to visitors, filtered like the backend:
/// ids resolved to names.
async fn public_presence(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if stale_bearer(&headers) {
        return unauthorized();
    }

    let state_name = query.get("county__state").map(|id| match id.as_str() {
        "1" => "Central Equatoria",
        "2" => "Eastern Equatoria",
        _ => "",
    });
    let county_name = query.get("county").map(|id| match id.as_str() {
        "10" => "Juba",
        "11" => "Yei",
        "20" => "Torit",
        _ => "",
    });
    let sector_name = query.get("sector").map(|id| match id.as_str() {
        "1" => "Health",
        "2" => "Education",
        _ => "",
    });
    let year: Option<i32> = query.get("year").and_then(|y| y.parse().ok());

    let results: Vec<Value> = PRESENCE
        .iter()
        .filter(|r| state_name.map_or(true, |s| s == r.2))
        .filter(|r| county_name.map_or(true, |c| c == r.3))
        .filter(|r| sector_name.map_or(true, |s| s == r.1))
        .filter(|r| year.map_or(true, |y| y == r.4))
        .map(presence_json)
        .collect();

    let count = results.len();
    Json(json!({ "results": results, "count": count })).into_response()
}

/// One result per page; the member directory reports a larger total.
async fn public_listing(
    headers: HeaderMap,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if stale_bearer(&headers) {
        return unauthorized();
    }
    let count = if collection == "members" { 37 } else { 1 };
    Json(json!({
        "results": [{
            "collection": collection,
            "search": query.get("search"),
        }],
        "count": count
    }))
    .into_response()
}

async fn member(headers: HeaderMap, Path(slug): Path<String>) -> Response {
    if stale_bearer(&headers) {
        return unauthorized();
    }
    if slug == "hope-relief" {
        Json(json!({ "name": "Hope Relief", "slug": slug })).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
    }
}

async fn faqs(headers: HeaderMap) -> Response {
    if stale_bearer(&headers) {
        return unauthorized();
    }
    Json(json!([
        { "question": "How do I join?", "answer": "Apply online." },
        { "question": "Is membership free?", "answer": "No." }
    ]))
    .into_response()
}
