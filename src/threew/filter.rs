// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Filter selection for the 3W view with the state/county cascade.

use crate::models::County;
use serde::{Deserialize, Serialize};

/// Independently settable 3W filters. A selected county always belongs to
/// the selected state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<u64>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown county: {0}")]
    UnknownCounty(u64),

    #[error("County {county} is not in state {state}")]
    CountyOutsideState { county: u64, state: u64 },
}

/// Counties belonging to `state`, or every county when no state is chosen.
pub fn available_counties(counties: &[County], state: Option<u64>) -> Vec<&County> {
    match state {
        Some(id) => counties.iter().filter(|c| c.state == id).collect(),
        None => counties.iter().collect(),
    }
}

impl FilterSelection {
    pub fn select_year(&mut self, year: Option<i32>) {
        self.year = year;
    }

    pub fn select_sector(&mut self, sector: Option<u64>) {
        self.sector = sector;
    }

    /// Set the state filter, dropping a county that no longer fits.
    pub fn select_state(&mut self, state: Option<u64>, counties: &[County]) {
        self.state = state;

        if let Some(county) = self.county {
            let owner = counties.iter().find(|c| c.id == county).map(|c| c.state);
            if owner.is_none() || owner != state {
                self.county = None;
            }
        }
    }

    /// Set the county filter. With a state selected, the county must be one
    /// of that state's counties.
    pub fn select_county(
        &mut self,
        county: Option<u64>,
        counties: &[County],
    ) -> Result<(), FilterError> {
        let Some(id) = county else {
            self.county = None;
            return Ok(());
        };

        let owner = counties
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.state)
            .ok_or(FilterError::UnknownCounty(id))?;

        if let Some(state) = self.state {
            if owner != state {
                return Err(FilterError::CountyOutsideState { county: id, state });
            }
        }

        self.county = Some(id);
        Ok(())
    }

    /// Query parameters for the public operational presence endpoint, which
    /// filters states through the county relation.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(state) = self.state {
            pairs.push(("county__state", state.to_string()));
        }
        if let Some(county) = self.county {
            pairs.push(("county", county.to_string()));
        }
        if let Some(sector) = self.sector {
            pairs.push(("sector", sector.to_string()));
        }
        pairs
    }
}
