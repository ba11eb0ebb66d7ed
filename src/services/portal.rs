// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portal endpoints: login, member profile, postings, documents, incident
//! reports, forum and public listings.
//!
//! Listing payloads are the backend's own JSON and are passed through
//! without a local schema.

use crate::models::{
    Collection, ForumCategory, LandingStats, ListPage, ListResponse, NewEvent, NewForumPost,
    NewJob, NewResource, NewTender, NewTraining, ProfileUpdate, SecurityIncidentReport,
};
use crate::services::api_client::{
    ApiClient, ApiRequest, ClientError, MultipartForm, Upload,
};
use crate::session::TokenPair;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Portal endpoints over a session's API client.
pub struct PortalService<'a> {
    client: &'a ApiClient,
}

impl<'a> PortalService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ListPage<T>, ClientError> {
        let list: ListResponse<T> = self.client.send_json(&request).await?;
        Ok(list.into_page())
    }

    async fn create<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, ClientError> {
        let request = ApiRequest::post(path).json(body)?;
        self.client.send_json(&request).await
    }

    // ─── Session ─────────────────────────────────────────────────

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ClientError> {
        let pair = self.client.login(username, password).await?;
        tracing::info!("Member signed in");
        Ok(pair)
    }

    pub fn logout(&self) {
        self.client.store().clear();
    }

    // ─── Profile ─────────────────────────────────────────────────

    pub async fn profile(&self) -> Result<Value, ClientError> {
        self.client.send_json(&ApiRequest::get("/profile/")).await
    }

    /// Update the organization profile, optionally replacing the logo.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
        logo: Option<Upload>,
    ) -> Result<Value, ClientError> {
        let mut form = update
            .fields()
            .into_iter()
            .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value));
        if let Some(logo) = logo {
            form = form.file("logo", logo)?;
        }

        let request = ApiRequest::patch("/profile/").multipart(form);
        self.client.send_json(&request).await
    }

    // ─── Postings ────────────────────────────────────────────────

    /// The calling member's own postings in a collection.
    pub async fn my_listings(&self, collection: Collection) -> Result<ListPage<Value>, ClientError> {
        self.list(ApiRequest::get(collection.member_path())).await
    }

    pub async fn create_event(&self, event: &NewEvent) -> Result<Value, ClientError> {
        self.create("/events/", event).await
    }

    pub async fn create_job(&self, job: &NewJob) -> Result<Value, ClientError> {
        self.create("/jobs/", job).await
    }

    pub async fn create_training(&self, training: &NewTraining) -> Result<Value, ClientError> {
        self.create("/trainings/", training).await
    }

    pub async fn create_tender(&self, tender: &NewTender) -> Result<Value, ClientError> {
        self.create("/tenders/", tender).await
    }

    // ─── Documents ───────────────────────────────────────────────

    pub async fn resource_categories(&self) -> Result<ListPage<Value>, ClientError> {
        self.list(ApiRequest::get("/resource-categories/")).await
    }

    pub async fn my_resources(&self) -> Result<ListPage<Value>, ClientError> {
        self.list(ApiRequest::get("/resources/")).await
    }

    pub async fn upload_resource(
        &self,
        resource: &NewResource,
        file: Upload,
    ) -> Result<Value, ClientError> {
        let form = MultipartForm::new()
            .text("title", resource.title.clone())
            .text("description", resource.description.clone())
            .text("category", resource.category.clone())
            .file("file", file)?;

        let request = ApiRequest::post("/resources/").multipart(form);
        self.client.send_json(&request).await
    }

    // ─── Security ────────────────────────────────────────────────

    pub async fn report_incident(
        &self,
        report: &SecurityIncidentReport,
    ) -> Result<Value, ClientError> {
        let created = self.create("/security/incidents/", report).await?;
        tracing::info!(incident_type = ?report.incident_type, "Security incident reported");
        Ok(created)
    }

    // ─── Forum ───────────────────────────────────────────────────

    pub async fn forum_categories(&self) -> Result<Vec<ForumCategory>, ClientError> {
        Ok(self
            .list(ApiRequest::get("/forum/categories/"))
            .await?
            .results)
    }

    pub async fn public_forum_posts(
        &self,
        query: &[(String, String)],
    ) -> Result<ListPage<Value>, ClientError> {
        let request = ApiRequest::get("/public/posts/").query_pairs(query.iter().cloned());
        self.list(request).await
    }

    pub async fn create_forum_post(&self, post: &NewForumPost) -> Result<Value, ClientError> {
        self.create("/forum/posts/", post).await
    }

    // ─── Public listings ─────────────────────────────────────────

    pub async fn public_listing(
        &self,
        collection: Collection,
        query: &[(String, String)],
    ) -> Result<ListPage<Value>, ClientError> {
        let request = ApiRequest::get(collection.public_path()).query_pairs(query.iter().cloned());
        self.list(request).await
    }

    /// A member organization by slug; `None` when the backend has no such member.
    pub async fn member_by_slug(&self, slug: &str) -> Result<Option<Value>, ClientError> {
        let path = format!("/public/members/{}/", urlencoding::encode(slug));
        let response = self.client.send(&ApiRequest::get(path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        response.json().map(Some)
    }

    pub async fn faqs(&self) -> Result<ListPage<Value>, ClientError> {
        self.list(ApiRequest::get("/faqs/")).await
    }

    async fn count(&self, path: &str) -> u64 {
        match self.list::<Value>(ApiRequest::get(path)).await {
            Ok(page) => page.count,
            Err(e) => {
                tracing::warn!(path, error = %e, "Landing count unavailable");
                0
            }
        }
    }

    /// Landing page counts, fetched concurrently.
    pub async fn landing_stats(&self) -> LandingStats {
        let members_path = Collection::Members.public_path();
        let events_path = Collection::Events.public_path();
        let resources_path = Collection::Resources.public_path();
        let (members, operational_presence, events, resources) = tokio::join!(
            self.count(&members_path),
            self.count("/public/operational-presence/"),
            self.count(&events_path),
            self.count(&resources_path),
        );
        LandingStats {
            members,
            operational_presence,
            events,
            resources,
        }
    }
}
