// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend fetches feeding the 3W view.

use crate::models::{
    County, ListResponse, NewPresence, OperationalPresence, Sector, State,
};
use crate::services::api_client::{ApiClient, ApiRequest, ClientError};
use crate::threew::{FilterSelection, ReferenceFetch};
use serde::de::DeserializeOwned;

/// 3W endpoints. The dashboard reads use the anonymous client; own
/// submissions need a session's client.
pub struct ThreeWService<'a> {
    client: &'a ApiClient,
}

impl<'a> ThreeWService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    async fn list<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Vec<T>, ClientError> {
        let list: ListResponse<T> = self.client.send_json(&request).await?;
        Ok(list.into_results())
    }

    /// Fetch states, counties and sectors concurrently. Each list succeeds
    /// or fails independently.
    pub async fn fetch_reference(&self) -> ReferenceFetch<ClientError> {
        let (states, counties, sectors) = tokio::join!(
            self.list::<State>(ApiRequest::get("/states/")),
            self.list::<County>(ApiRequest::get("/counties/")),
            self.list::<Sector>(ApiRequest::get("/sectors/")),
        );
        ReferenceFetch {
            states,
            counties,
            sectors,
        }
    }

    /// Records of every member for a selection, filtered server-side.
    pub async fn fetch_records(
        &self,
        selection: &FilterSelection,
    ) -> Result<Vec<OperationalPresence>, ClientError> {
        let request = ApiRequest::get("/public/operational-presence/")
            .query_pairs(selection.query_pairs());
        self.list(request).await
    }

    /// The calling member's own submissions.
    pub async fn my_presence(&self) -> Result<Vec<OperationalPresence>, ClientError> {
        self.list(ApiRequest::get("/operational-presence/")).await
    }

    pub async fn submit_presence(
        &self,
        presence: &NewPresence,
    ) -> Result<serde_json::Value, ClientError> {
        let request = ApiRequest::post("/operational-presence/").json(presence)?;
        self.client.send_json(&request).await
    }
}
