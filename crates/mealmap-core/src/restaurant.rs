//! Restaurant records produced by the places search.

use serde::{Deserialize, Serialize};

/// A geographic position as the client supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Returns `true` if the position lies within the valid WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One place returned by a restaurant search.
///
/// Constructed fresh per search request from the provider payload; never
/// persisted server-side. `id` is unique within a single search response:
/// the provider place id where present, otherwise a coordinate-derived
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub distance_meters: f64,
    /// Raw category tags as the provider reported them.
    pub categories: Vec<String>,
    /// Derived cuisine labels; never empty ("general" fallback).
    pub cuisine_types: Vec<String>,
    /// Derived health score, always in [0, 100].
    pub health_score: u8,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub price_level: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
}
