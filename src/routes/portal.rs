// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member area routes. The session guard is applied in routes/mod.rs.

use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::config::MAX_UPLOAD_BYTES;
use crate::error::{AppError, Result};
use crate::middleware::SessionHandle;
use crate::models::{
    Collection, ForumCategory, ListPage, NewEvent, NewForumPost, NewJob, NewPresence,
    NewResource, NewTender, NewTraining, OperationalPresence, ProfileUpdate,
    SecurityIncidentReport,
};
use crate::routes::auth::SessionUser;
use crate::services::{ApiClient, PortalService, ThreeWService, Upload};
use crate::AppState;

/// Request body ceiling for upload routes: the file plus form fields.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portal/dashboard", get(dashboard))
        .route(
            "/portal/profile",
            get(get_profile)
                .patch(update_profile)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/portal/events", get(list_events).post(create_event))
        .route("/portal/jobs", get(list_jobs).post(create_job))
        .route("/portal/trainings", get(list_trainings).post(create_training))
        .route("/portal/tenders", get(list_tenders).post(create_tender))
        .route(
            "/portal/documents",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/portal/documents/categories", get(document_categories))
        .route("/portal/security/incidents", post(report_incident))
        .route("/portal/forum/categories", get(forum_categories))
        .route("/portal/forum/posts", post(create_forum_post))
        .route(
            "/portal/operational-data",
            get(list_operational_data).post(submit_operational_data),
        )
}

type Created = (StatusCode, Json<Value>);

fn client(state: &AppState, session: &SessionHandle) -> ApiClient {
    state.api_client(session.store())
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct PostingCounts {
    pub events: u64,
    pub jobs: u64,
    pub trainings: u64,
    pub tenders: u64,
    pub resources: u64,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub user: Option<SessionUser>,
    pub profile: Value,
    pub postings: PostingCounts,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<DashboardResponse>> {
    let client = client(&state, &session);
    let portal = PortalService::new(&client);

    // The profile goes first so an expired access token is refreshed once
    // rather than by every concurrent call.
    let profile = portal.profile().await?;
    let (events, jobs, trainings, tenders, resources) = tokio::join!(
        portal.my_listings(Collection::Events),
        portal.my_listings(Collection::Jobs),
        portal.my_listings(Collection::Trainings),
        portal.my_listings(Collection::Tenders),
        portal.my_resources(),
    );

    let postings = PostingCounts {
        events: events?.count,
        jobs: jobs?.count,
        trainings: trainings?.count,
        tenders: tenders?.count,
        resources: resources?.count,
    };

    Ok(Json(DashboardResponse {
        user: session.evaluator().current_user().map(SessionUser::from),
        profile,
        postings,
    }))
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<Value>> {
    let client = client(&state, &session);
    Ok(Json(PortalService::new(&client).profile().await?))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let mut form = read_multipart(multipart, "logo").await?;
    let update = ProfileUpdate {
        name: form.take("name"),
        description: form.take("description"),
        website: Some(form.take("website")).filter(|w| !w.is_empty()),
        email: form.take("email"),
        phone: form.take("phone"),
        address: form.take("address"),
    };
    update.validate()?;

    let client = client(&state, &session);
    let updated = PortalService::new(&client)
        .update_profile(&update, form.file)
        .await?;
    Ok(Json(updated))
}

// ─── Postings ────────────────────────────────────────────────

async fn own_listings(
    state: &AppState,
    session: &SessionHandle,
    collection: Collection,
) -> Result<Json<ListPage<Value>>> {
    let client = client(state, session);
    let page = PortalService::new(&client).my_listings(collection).await?;
    Ok(Json(page))
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ListPage<Value>>> {
    own_listings(&state, &session, Collection::Events).await
}

async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ListPage<Value>>> {
    own_listings(&state, &session, Collection::Jobs).await
}

async fn list_trainings(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ListPage<Value>>> {
    own_listings(&state, &session, Collection::Trainings).await
}

async fn list_tenders(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ListPage<Value>>> {
    own_listings(&state, &session, Collection::Tenders).await
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(event): Json<NewEvent>,
) -> Result<Created> {
    event.validate()?;
    let client = client(&state, &session);
    let created = PortalService::new(&client).create_event(&event).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_job(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(job): Json<NewJob>,
) -> Result<Created> {
    job.validate()?;
    let client = client(&state, &session);
    let created = PortalService::new(&client).create_job(&job).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_training(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(training): Json<NewTraining>,
) -> Result<Created> {
    training.validate()?;
    let client = client(&state, &session);
    let created = PortalService::new(&client)
        .create_training(&training)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_tender(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(tender): Json<NewTender>,
) -> Result<Created> {
    tender.validate()?;
    let client = client(&state, &session);
    let created = PortalService::new(&client).create_tender(&tender).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ─── Documents ───────────────────────────────────────────────

async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ListPage<Value>>> {
    let client = client(&state, &session);
    Ok(Json(PortalService::new(&client).my_resources().await?))
}

async fn document_categories(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ListPage<Value>>> {
    let client = client(&state, &session);
    Ok(Json(PortalService::new(&client).resource_categories().await?))
}

async fn upload_document(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    multipart: Multipart,
) -> Result<Created> {
    let mut form = read_multipart(multipart, "file").await?;
    let resource = NewResource {
        title: form.take("title"),
        description: form.take("description"),
        category: form.take("category"),
    };
    resource.validate()?;
    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("A file is required".to_string()))?;

    let client = client(&state, &session);
    let created = PortalService::new(&client)
        .upload_resource(&resource, file)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ─── Security & forum ────────────────────────────────────────

async fn report_incident(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(report): Json<SecurityIncidentReport>,
) -> Result<Created> {
    report.validate()?;
    let client = client(&state, &session);
    let created = PortalService::new(&client).report_incident(&report).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn forum_categories(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<Vec<ForumCategory>>> {
    let client = client(&state, &session);
    Ok(Json(PortalService::new(&client).forum_categories().await?))
}

async fn create_forum_post(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(post): Json<NewForumPost>,
) -> Result<Created> {
    post.validate()?;
    let client = client(&state, &session);
    let created = PortalService::new(&client).create_forum_post(&post).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ─── Operational data ────────────────────────────────────────

async fn list_operational_data(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<Vec<OperationalPresence>>> {
    let client = client(&state, &session);
    Ok(Json(ThreeWService::new(&client).my_presence().await?))
}

async fn submit_operational_data(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(presence): Json<NewPresence>,
) -> Result<Created> {
    presence.validate()?;
    let client = client(&state, &session);
    let created = ThreeWService::new(&client)
        .submit_presence(&presence)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ─── Multipart ───────────────────────────────────────────────

/// Text fields and at most one file from a multipart body.
#[derive(Debug, Default)]
struct MultipartFields {
    text: HashMap<String, String>,
    file: Option<Upload>,
}

impl MultipartFields {
    fn take(&mut self, name: &str) -> String {
        self.text.remove(name).unwrap_or_default()
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(UPLOAD_BODY_LIMIT)
    } else {
        AppError::BadRequest(err.body_text())
    }
}

async fn read_upload(field: Field<'_>) -> Result<Option<Upload>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(multipart_error)?;

    // Browsers send an empty part when no file was chosen.
    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(data.len()));
    }

    Ok(Some(Upload {
        file_name,
        content_type,
        data: data.to_vec(),
    }))
}

async fn read_multipart(mut multipart: Multipart, file_field: &str) -> Result<MultipartFields> {
    let mut fields = MultipartFields::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            fields.file = read_upload(field).await?;
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            fields.text.insert(name, value);
        }
    }

    Ok(fields)
}
