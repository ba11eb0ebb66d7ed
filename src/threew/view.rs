// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stateful 3W view: reference lists, current selection and the records
//! fetched for it.
//!
//! Each selection change issues a [`FetchTicket`] with a new generation.
//! Results are committed only for the latest generation, so a slow response
//! for an older selection can never overwrite a newer one. Failed fetches
//! keep the previous data.

use super::aggregate::{aggregate, Summary};
use super::filter::{available_counties, FilterError, FilterSelection};
use super::markers::{group_by_county, marker_layer, CountyGroup};
use crate::models::{County, OperationalPresence, Sector, State};
use std::fmt::Display;

/// Reference lists fetched independently; each may fail on its own.
#[derive(Debug)]
pub struct ReferenceFetch<E> {
    pub states: Result<Vec<State>, E>,
    pub counties: Result<Vec<County>, E>,
    pub sectors: Result<Vec<Sector>, E>,
}

/// Handle for one in-flight record fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub selection: FilterSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// A newer fetch was issued; the result was dropped.
    Stale,
    /// The fetch failed; previous records kept.
    Failed,
}

#[derive(Debug, Default)]
pub struct ThreeWView {
    states: Vec<State>,
    counties: Vec<County>,
    sectors: Vec<Sector>,
    selection: FilterSelection,
    records: Vec<OperationalPresence>,
    issued: u64,
    committed: Option<u64>,
}

impl ThreeWView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn counties(&self) -> &[County] {
        &self.counties
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn records(&self) -> &[OperationalPresence] {
        &self.records
    }

    /// Generation of the last committed fetch, if any.
    pub fn committed_generation(&self) -> Option<u64> {
        self.committed
    }

    /// Apply reference lists, keeping the previous list for any that failed.
    pub fn apply_reference<E: Display>(&mut self, fetch: ReferenceFetch<E>) {
        match fetch.states {
            Ok(states) => self.states = states,
            Err(e) => tracing::warn!(error = %e, "Failed to fetch states, keeping previous list"),
        }
        match fetch.counties {
            Ok(counties) => self.counties = counties,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch counties, keeping previous list")
            }
        }
        match fetch.sectors {
            Ok(sectors) => self.sectors = sectors,
            Err(e) => tracing::warn!(error = %e, "Failed to fetch sectors, keeping previous list"),
        }
    }

    /// Counties offered for the currently selected state.
    pub fn available_counties(&self) -> Vec<&County> {
        available_counties(&self.counties, self.selection.state)
    }

    /// Issue a fetch for the current selection.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            generation: self.issued,
            selection: self.selection.clone(),
        }
    }

    pub fn select_year(&mut self, year: Option<i32>) -> FetchTicket {
        self.selection.select_year(year);
        self.begin_fetch()
    }

    pub fn select_sector(&mut self, sector: Option<u64>) -> FetchTicket {
        self.selection.select_sector(sector);
        self.begin_fetch()
    }

    pub fn select_state(&mut self, state: Option<u64>) -> FetchTicket {
        self.selection.select_state(state, &self.counties);
        self.begin_fetch()
    }

    pub fn select_county(&mut self, county: Option<u64>) -> Result<FetchTicket, FilterError> {
        self.selection.select_county(county, &self.counties)?;
        Ok(self.begin_fetch())
    }

    /// Commit a fetch result if it belongs to the latest issued fetch.
    pub fn commit<E: Display>(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<OperationalPresence>, E>,
    ) -> CommitOutcome {
        if ticket.generation != self.issued {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                "Dropping stale 3W result"
            );
            return CommitOutcome::Stale;
        }

        match result {
            Ok(records) => {
                self.records = records;
                self.committed = Some(ticket.generation);
                CommitOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch 3W data, keeping previous records");
                CommitOutcome::Failed
            }
        }
    }

    pub fn summary(&self) -> Summary {
        aggregate(&self.records)
    }

    pub fn groups(&self) -> Vec<CountyGroup<'_>> {
        group_by_county(&self.records)
    }

    pub fn markers(&self) -> geojson::FeatureCollection {
        marker_layer(&self.groups())
    }
}
