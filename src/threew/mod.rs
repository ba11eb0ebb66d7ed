// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 3W (Who, What, Where) filter-and-aggregate view.

pub mod aggregate;
pub mod filter;
pub mod markers;
pub mod view;

pub use aggregate::{aggregate, Summary};
pub use filter::{available_counties, FilterError, FilterSelection};
pub use markers::{group_by_county, marker_layer, marker_radius, CountyGroup};
pub use view::{CommitOutcome, FetchTicket, ReferenceFetch, ThreeWView};
