// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! County grouping and the GeoJSON marker layer for the 3W map.

use crate::models::OperationalPresence;
use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use indexmap::IndexMap;
use serde::Serialize;

/// Largest marker radius in pixels.
pub const MAX_MARKER_RADIUS: u32 = 30;

/// Map centre of South Sudan, used for counties without a known coordinate.
pub const FALLBACK_COORDINATE: (f64, f64) = (6.8769, 31.3070);

/// Approximate county centres as (latitude, longitude).
const COUNTY_COORDINATES: &[(&str, (f64, f64))] = &[
    ("Juba", (4.8517, 31.5825)),
    ("Torit", (4.4141, 32.5697)),
    ("Yei", (4.0900, 30.6783)),
    ("Bor", (6.2067, 31.5597)),
    ("Wau", (7.7028, 27.9950)),
    ("Aweil", (8.7667, 27.4000)),
    ("Rumbek", (6.8028, 29.6789)),
    ("Bentiu", (9.2333, 29.7833)),
    ("Malakal", (9.5334, 31.6500)),
    ("Kapoeta", (4.7717, 33.5903)),
];

/// Marker radius for a group of `count` records: `min(count * 2 + 5, 30)`.
pub fn marker_radius(count: usize) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count
        .saturating_mul(2)
        .saturating_add(5)
        .min(MAX_MARKER_RADIUS)
}

/// Map position of a county, falling back to the country centre.
pub fn county_point(county: &str) -> Point<f64> {
    let (lat, lon) = COUNTY_COORDINATES
        .iter()
        .find(|(name, _)| *name == county)
        .map(|(_, coord)| *coord)
        .unwrap_or(FALLBACK_COORDINATE);
    Point::new(lon, lat)
}

/// Grouping key: county names repeat across states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocationKey {
    pub state: String,
    pub county: String,
}

/// Records sharing one (state, county) location.
#[derive(Debug, Clone, Serialize)]
pub struct CountyGroup<'a> {
    pub state: &'a str,
    pub county: &'a str,
    #[serde(skip)]
    pub records: Vec<&'a OperationalPresence>,
    /// Records per sector, in first-seen order
    pub sectors: IndexMap<&'a str, u32>,
}

impl CountyGroup<'_> {
    pub fn activities(&self) -> usize {
        self.records.len()
    }

    pub fn radius(&self) -> u32 {
        marker_radius(self.records.len())
    }

    pub fn point(&self) -> Point<f64> {
        county_point(self.county)
    }
}

/// Partition records by (state, county), keeping first-seen group order.
pub fn group_by_county(records: &[OperationalPresence]) -> Vec<CountyGroup<'_>> {
    let mut groups: IndexMap<LocationKey, CountyGroup<'_>> = IndexMap::new();

    for record in records {
        let key = LocationKey {
            state: record.state.clone(),
            county: record.county.clone(),
        };
        let group = groups.entry(key).or_insert_with(|| CountyGroup {
            state: &record.state,
            county: &record.county,
            records: Vec::new(),
            sectors: IndexMap::new(),
        });
        group.records.push(record);
        *group.sectors.entry(record.sector.as_str()).or_insert(0) += 1;
    }

    groups.into_values().collect()
}

/// One point feature per county group, styled by the browser.
pub fn marker_layer(groups: &[CountyGroup<'_>]) -> FeatureCollection {
    let features = groups
        .iter()
        .map(|group| {
            let mut properties = JsonObject::new();
            properties.insert("county".to_string(), group.county.into());
            properties.insert("state".to_string(), group.state.into());
            properties.insert("activities".to_string(), group.activities().into());
            properties.insert("radius".to_string(), group.radius().into());
            properties.insert(
                "sectors".to_string(),
                serde_json::to_value(&group.sectors).unwrap_or_default(),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&group.point()))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
