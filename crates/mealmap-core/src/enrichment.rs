//! Scraped review/photo enrichment for a restaurant name query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate review metrics scraped from the review site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub smile_count: Option<u32>,
    pub cry_count: Option<u32>,
}

/// One restaurant image from the review site's photo gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantImage {
    pub url: String,
    pub alt: Option<String>,
    pub is_main: bool,
}

/// Cached scrape result for one restaurant name query.
///
/// When `matched` is false the record carries no name, URL, images, or
/// reviews — absence of a match is a normal outcome, not an error.
/// `scraped_at` is always set on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// The original query string, as received.
    pub query: String,
    pub matched: bool,
    /// Match confidence in [0, 1]; 0 when unmatched.
    pub confidence: f64,
    pub name: Option<String>,
    pub url: Option<String>,
    /// The review site's internal id for the matched restaurant.
    pub source_id: Option<String>,
    pub district: Option<String>,
    pub cuisine_types: Vec<String>,
    pub price_range: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub reviews: Option<ReviewStats>,
    pub review_texts: Vec<String>,
    pub images: Vec<RestaurantImage>,
    pub scraped_at: DateTime<Utc>,
}

impl EnrichmentRecord {
    /// Builds an unmatched record for `query` with the given confidence.
    #[must_use]
    pub fn unmatched(query: &str, confidence: f64) -> Self {
        Self {
            query: query.to_owned(),
            matched: false,
            confidence,
            name: None,
            url: None,
            source_id: None,
            district: None,
            cuisine_types: Vec::new(),
            price_range: None,
            address: None,
            phone: None,
            reviews: None,
            review_texts: Vec::new(),
            images: Vec::new(),
            scraped_at: Utc::now(),
        }
    }
}
