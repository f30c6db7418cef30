//! Integration tests for the enrichment orchestrator: cache read-through,
//! stampede prevention, negative-result policy, and batch ordering.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use mealmap_core::EnrichmentRecord;
use mealmap_scraper::{Enricher, FileCache, RestaurantScraper, ScrapeError};

/// Stub scraper that counts invocations and returns a matched record.
struct CountingScraper {
    calls: AtomicU32,
    delay_ms: u64,
}

impl CountingScraper {
    fn new(delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            delay_ms,
        })
    }
}

#[async_trait]
impl RestaurantScraper for CountingScraper {
    async fn scrape(&self, query: &str) -> Result<EnrichmentRecord, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        let mut record = EnrichmentRecord::unmatched(query, 0.95);
        record.matched = true;
        record.name = Some(format!("{query} (matched)"));
        Ok(record)
    }
}

/// Stub scraper that always fails, counting attempts.
struct FailingScraper {
    calls: AtomicU32,
}

#[async_trait]
impl RestaurantScraper for FailingScraper {
    async fn scrape(&self, query: &str) -> Result<EnrichmentRecord, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ScrapeError::Timeout {
            url: format!("https://test.local/{query}"),
        })
    }
}

/// Stub scraper that fails for one specific name and matches the rest.
struct SelectiveScraper {
    failing_name: String,
}

#[async_trait]
impl RestaurantScraper for SelectiveScraper {
    async fn scrape(&self, query: &str) -> Result<EnrichmentRecord, ScrapeError> {
        if query == self.failing_name {
            return Err(ScrapeError::Timeout {
                url: format!("https://test.local/{query}"),
            });
        }
        let mut record = EnrichmentRecord::unmatched(query, 0.9);
        record.matched = true;
        record.name = Some(query.to_owned());
        Ok(record)
    }
}

fn enricher_with(dir: &TempDir, scraper: Arc<dyn RestaurantScraper>) -> Enricher {
    Enricher::new(FileCache::new(dir.path(), 168), scraper, 2)
}

#[tokio::test]
async fn first_lookup_scrapes_and_second_hits_the_cache() {
    let dir = TempDir::new().unwrap();
    let scraper = CountingScraper::new(0);
    let enricher = enricher_with(&dir, Arc::clone(&scraper) as Arc<dyn RestaurantScraper>);

    let first = enricher.enrich("KFC").await;
    assert!(!first.cache_hit);
    assert!(first.record.matched);
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);

    let second = enricher.enrich("KFC").await;
    assert!(second.cache_hit);
    assert_eq!(second.record.name.as_deref(), Some("KFC (matched)"));
    // The scraper was not invoked again.
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cache_key_is_the_normalized_name() {
    let dir = TempDir::new().unwrap();
    let scraper = CountingScraper::new(0);
    let enricher = enricher_with(&dir, Arc::clone(&scraper) as Arc<dyn RestaurantScraper>);

    enricher.enrich("KFC").await;
    let hit = enricher.enrich("  kfc ").await;
    assert!(hit.cache_hit);
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_requests_for_one_name_trigger_exactly_one_scrape() {
    let dir = TempDir::new().unwrap();
    // A slow scrape so all tasks pile up while it is in flight.
    let scraper = CountingScraper::new(100);
    let enricher = enricher_with(&dir, Arc::clone(&scraper) as Arc<dyn RestaurantScraper>);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let enricher = enricher.clone();
        handles.push(tokio::spawn(async move { enricher.enrich("KFC").await }));
    }

    let mut matched = 0;
    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(outcome.record.matched);
        matched += 1;
    }
    assert_eq!(matched, 8);
    assert_eq!(
        scraper.calls.load(Ordering::SeqCst),
        1,
        "coalescing must collapse concurrent scrapes for one name"
    );
}

#[tokio::test]
async fn distinct_names_scrape_independently() {
    let dir = TempDir::new().unwrap();
    let scraper = CountingScraper::new(10);
    let enricher = enricher_with(&dir, Arc::clone(&scraper) as Arc<dyn RestaurantScraper>);

    let a = enricher.clone();
    let b = enricher.clone();
    let (left, right) = tokio::join!(a.enrich("Cafe One"), b.enrich("Cafe Two"));
    assert!(left.record.matched);
    assert!(right.record.matched);
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn scrape_failure_degrades_to_unmatched_and_is_not_cached() {
    let dir = TempDir::new().unwrap();
    let scraper = Arc::new(FailingScraper {
        calls: AtomicU32::new(0),
    });
    let enricher = enricher_with(&dir, Arc::clone(&scraper) as Arc<dyn RestaurantScraper>);

    let first = enricher.enrich("Ghost Kitchen").await;
    assert!(!first.record.matched);
    assert_eq!(first.record.confidence, 0.0);
    assert!(!first.cache_hit);

    // The failure was not cached: the next request scrapes again.
    let second = enricher.enrich("Ghost Kitchen").await;
    assert!(!second.cache_hit);
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn batch_preserves_order_and_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let scraper = Arc::new(SelectiveScraper {
        failing_name: "B".to_owned(),
    });
    let enricher = enricher_with(&dir, scraper);

    let queries = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];
    let outcomes = enricher.enrich_batch(&queries).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].record.query, "A");
    assert!(outcomes[0].record.matched);
    assert_eq!(outcomes[1].record.query, "B");
    assert!(!outcomes[1].record.matched);
    assert_eq!(outcomes[2].record.query, "C");
    assert!(outcomes[2].record.matched);
}

#[tokio::test]
async fn batch_of_same_name_coalesces_to_one_scrape() {
    let dir = TempDir::new().unwrap();
    let scraper = CountingScraper::new(50);
    let enricher = enricher_with(&dir, Arc::clone(&scraper) as Arc<dyn RestaurantScraper>);

    let queries = vec!["KFC".to_owned(), "KFC".to_owned(), "KFC".to_owned()];
    let outcomes = enricher.enrich_batch(&queries).await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.record.matched));
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cache_io_failure_fails_open_to_scraping() {
    // Point the cache at a path that cannot be a directory.
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file in the way").unwrap();

    let scraper = CountingScraper::new(0);
    let enricher = Enricher::new(
        FileCache::new(&blocker, 168),
        Arc::clone(&scraper) as Arc<dyn RestaurantScraper>,
        2,
    );

    // Reads miss, writes fail, but the caller still gets a result.
    let outcome = enricher.enrich("KFC").await;
    assert!(outcome.record.matched);
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
}
