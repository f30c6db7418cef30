//! The three-stage review-site scrape: search → detail → photo gallery.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use mealmap_core::{EnrichmentRecord, ReviewStats};

use crate::browser::BrowserEngine;
use crate::enrich::RestaurantScraper;
use crate::error::ScrapeError;
use crate::matching::{best_match, MIN_MATCH_CONFIDENCE};
use crate::parse;

/// Maximum images taken from the photo gallery.
pub const MAX_IMAGES: usize = 3;

/// Maximum review excerpts kept from the detail page.
pub const MAX_REVIEW_EXCERPTS: usize = 5;

/// Markers that real content has replaced the challenge shell, across all
/// three page types.
const CONTENT_READY_SELECTOR: &str =
    "div.poi-list-cell, div.restaurant-detail, section.address-section";

/// Delay between retry attempts for a failed navigation.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Scraper for the review site, generic over the rendering engine so tests
/// run against canned HTML.
///
/// This is the most expensive operation in the system — three sequential
/// page navigations on the cold path — so every caller treats it as a slow,
/// best-effort augmentation behind the enrichment cache.
#[derive(Debug)]
pub struct OpenRiceScraper<E> {
    engine: E,
    base_url: String,
    max_retries: u32,
    inter_request_delay: Duration,
}

impl<E: BrowserEngine> OpenRiceScraper<E> {
    #[must_use]
    pub fn new(engine: E, base_url: &str, max_retries: u32, inter_request_delay_ms: u64) -> Self {
        Self {
            engine,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries,
            inter_request_delay: Duration::from_millis(inter_request_delay_ms),
        }
    }

    fn search_url(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
        format!("{}/en/hongkong/restaurants?whatwhere={encoded}", self.base_url)
    }

    /// Fetches one rendered page, retrying failed navigations.
    async fn get_page(&self, url: &str) -> Result<String, ScrapeError> {
        let mut attempt = 0u32;
        loop {
            match self.engine.fetch_rendered(url, CONTENT_READY_SELECTOR).await {
                Ok(html) => return Ok(html),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        url,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "page load failed — retrying"
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn delay(&self) {
        if !self.inter_request_delay.is_zero() {
            tokio::time::sleep(self.inter_request_delay).await;
        }
    }

    /// Runs the full scrape for one restaurant name.
    ///
    /// A failed search navigation is an error (the caller must not cache
    /// it); an empty result list or a low-confidence best candidate is a
    /// successful unmatched record. Detail-page and gallery failures
    /// degrade to a partial matched record.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] when the search page cannot be loaded or
    /// parsed after all retries.
    pub async fn scrape_restaurant(&self, query: &str) -> Result<EnrichmentRecord, ScrapeError> {
        tracing::info!(query, "scraping review site");

        let html = self.get_page(&self.search_url(query)).await?;
        let candidates = parse::search_results(&html, &self.base_url)?;
        if candidates.is_empty() {
            tracing::info!(query, "no search results");
            return Ok(EnrichmentRecord::unmatched(query, 0.0));
        }

        let Some((best, confidence)) = best_match(query, &candidates) else {
            return Ok(EnrichmentRecord::unmatched(query, 0.0));
        };
        if confidence < MIN_MATCH_CONFIDENCE {
            tracing::info!(query, confidence, "best candidate below match threshold");
            return Ok(EnrichmentRecord::unmatched(query, confidence));
        }
        tracing::info!(query, matched = %best.name, confidence, "candidate selected");

        let mut record = EnrichmentRecord {
            query: query.to_owned(),
            matched: true,
            confidence,
            name: Some(best.name.clone()),
            url: Some(best.url.clone()),
            source_id: best.source_id.clone(),
            district: best.district.clone(),
            cuisine_types: best.cuisine_types.clone(),
            price_range: best.price_range.clone(),
            address: None,
            phone: None,
            reviews: Some(ReviewStats {
                smile_count: best.smile_count,
                ..ReviewStats::default()
            }),
            review_texts: Vec::new(),
            images: Vec::new(),
            scraped_at: Utc::now(),
        };

        self.delay().await;
        match self.get_page(&best.url).await {
            Ok(html) => match parse::detail_page(&html) {
                Ok(detail) => {
                    record.address = detail.address;
                    record.phone = detail.phone;
                    if let Some(reviews) = record.reviews.as_mut() {
                        reviews.rating = detail.rating;
                        reviews.review_count = detail.review_count;
                    }
                    record.review_texts = detail.review_texts;
                    record.review_texts.truncate(MAX_REVIEW_EXCERPTS);
                }
                Err(e) => {
                    tracing::warn!(query, error = %e, "detail extraction failed");
                }
            },
            Err(e) => {
                tracing::warn!(query, error = %e, "detail page failed; keeping search-level data");
            }
        }

        self.delay().await;
        let photos_url = format!("{}/photos/all", best.url.trim_end_matches('/'));
        match self.get_page(&photos_url).await {
            Ok(html) => match parse::photo_gallery(&html, MAX_IMAGES) {
                Ok(images) => record.images = images,
                Err(e) => {
                    tracing::warn!(query, error = %e, "gallery extraction failed");
                }
            },
            Err(e) => {
                tracing::warn!(query, error = %e, "photo gallery failed; keeping record without images");
            }
        }

        Ok(record)
    }
}

#[async_trait]
impl<E: BrowserEngine> RestaurantScraper for OpenRiceScraper<E> {
    async fn scrape(&self, query: &str) -> Result<EnrichmentRecord, ScrapeError> {
        self.scrape_restaurant(query).await
    }
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
