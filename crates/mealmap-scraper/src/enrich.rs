//! Enrichment orchestration: cache read-through, stampede prevention, and
//! bounded scrape concurrency.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use mealmap_core::EnrichmentRecord;

use crate::cache::FileCache;
use crate::error::ScrapeError;

/// The injectable scrape seam. Production wires an `OpenRiceScraper`;
/// tests substitute counting or failing stubs.
#[async_trait]
pub trait RestaurantScraper: Send + Sync {
    /// Scrapes enrichment data for one restaurant name.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] on unrecoverable navigation or extraction
    /// failure; the orchestrator degrades that to an unmatched record.
    async fn scrape(&self, query: &str) -> Result<EnrichmentRecord, ScrapeError>;
}

/// Stand-in scraper for deployments where no browser engine could be
/// started; every lookup degrades to an unmatched record, keeping the rest
/// of the service available.
#[derive(Debug, Clone, Copy)]
pub struct UnavailableScraper;

#[async_trait]
impl RestaurantScraper for UnavailableScraper {
    async fn scrape(&self, _query: &str) -> Result<EnrichmentRecord, ScrapeError> {
        Err(ScrapeError::Launch {
            reason: "browser engine unavailable".to_owned(),
        })
    }
}

/// Per-key in-flight tracking so concurrent requests for the same name
/// coalesce onto a single scrape instead of stampeding the browser.
#[derive(Debug, Default)]
pub struct FlightRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FlightRegistry {
    /// Returns the lock guarding scrapes for `key`, creating it on first use.
    pub async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(key.to_owned()).or_default())
    }

    /// Drops the entry for `key` once no caller holds its lock anymore.
    pub async fn release(&self, key: &str) {
        let mut locks = self.locks.lock().await;
        // strong_count == 1 means only the map itself still references it.
        if locks.get(key).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

/// The result of one enrichment request.
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    pub record: EnrichmentRecord,
    pub cache_hit: bool,
    pub elapsed: Duration,
}

struct EnricherInner {
    cache: FileCache,
    scraper: Arc<dyn RestaurantScraper>,
    inflight: FlightRegistry,
    scrape_permits: Semaphore,
}

/// Read-through enrichment over the cache and scraper.
///
/// Cheap to clone; all clones share the cache, the in-flight registry, and
/// the scrape concurrency limit. Never returns an error: scrape failures
/// degrade to unmatched records, and only positive (matched) results are
/// cached, so a later retry is never shadowed by a stale failure.
#[derive(Clone)]
pub struct Enricher {
    inner: Arc<EnricherInner>,
}

impl Enricher {
    #[must_use]
    pub fn new(
        cache: FileCache,
        scraper: Arc<dyn RestaurantScraper>,
        max_concurrent_scrapes: usize,
    ) -> Self {
        Self {
            inner: Arc::new(EnricherInner {
                cache,
                scraper,
                inflight: FlightRegistry::default(),
                scrape_permits: Semaphore::new(max_concurrent_scrapes.max(1)),
            }),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &FileCache {
        &self.inner.cache
    }

    /// Enriches one restaurant name, serving from the cache when possible.
    pub async fn enrich(&self, query: &str) -> EnrichmentOutcome {
        let started = Instant::now();

        if let Some(record) = self.inner.cache.get(query).await {
            tracing::info!(query, "enrichment cache hit");
            return EnrichmentOutcome {
                record,
                cache_hit: true,
                elapsed: started.elapsed(),
            };
        }

        // Run the fill in its own task: if the caller's request is aborted
        // (client disconnect), the scrape still completes and populates the
        // cache for concurrent waiters and future requests.
        let inner = Arc::clone(&self.inner);
        let owned_query = query.to_owned();
        let handle = tokio::spawn(async move { inner.fill(&owned_query).await });

        match handle.await {
            Ok((record, cache_hit)) => EnrichmentOutcome {
                record,
                cache_hit,
                elapsed: started.elapsed(),
            },
            Err(e) => {
                tracing::error!(query, error = %e, "enrichment task failed");
                EnrichmentOutcome {
                    record: EnrichmentRecord::unmatched(query, 0.0),
                    cache_hit: false,
                    elapsed: started.elapsed(),
                }
            }
        }
    }

    /// Enriches a batch of names, preserving input order.
    ///
    /// Items are processed concurrently; the shared semaphore bounds how
    /// many scrapes actually run at once, and one failing lookup never
    /// aborts the rest.
    pub async fn enrich_batch(&self, queries: &[String]) -> Vec<EnrichmentOutcome> {
        let futures = queries.iter().map(|query| self.enrich(query));
        futures::future::join_all(futures).await
    }
}

impl EnricherInner {
    async fn fill(&self, query: &str) -> (EnrichmentRecord, bool) {
        let key = FileCache::normalize_key(query);
        let lock = self.inflight.key_lock(&key).await;
        let result = {
            let _guard = lock.lock().await;

            // A coalesced scrape may have finished while we waited on the
            // key lock; its result is in the cache now.
            if let Some(record) = self.cache.get(query).await {
                tracing::info!(query, "coalesced onto a completed in-flight scrape");
                (record, true)
            } else {
                self.scrape_and_store(query).await
            }
        };
        drop(lock);
        self.inflight.release(&key).await;
        result
    }

    async fn scrape_and_store(&self, query: &str) -> (EnrichmentRecord, bool) {
        // The semaphore is never closed, so acquisition only fails if the
        // runtime is shutting down — in which case scraping unbounded is moot.
        let _permit = self.scrape_permits.acquire().await.ok();

        match self.scraper.scrape(query).await {
            Ok(record) => {
                if record.matched {
                    if let Err(e) = self.cache.put(query, &record).await {
                        tracing::warn!(query, error = %e, "failed to cache enrichment result");
                    }
                } else {
                    // Negative results are not cached; the next request
                    // retries the scrape.
                    tracing::info!(query, "scrape found no match; not caching");
                }
                (record, false)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "scrape failed; degrading to unmatched");
                (EnrichmentRecord::unmatched(query, 0.0), false)
            }
        }
    }
}
