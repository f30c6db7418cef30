//! File-backed enrichment cache with time-based expiry.
//!
//! One JSON file per normalized query, named by the SHA-256 of the key so
//! arbitrary restaurant names map to safe file names. Reads fail open:
//! an expired, missing, or unreadable entry is simply a miss.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use mealmap_core::EnrichmentRecord;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Counters for the cache maintenance endpoints.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub directory: PathBuf,
}

/// On-disk envelope wrapping a cached record with its write timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    cached_at: DateTime<Utc>,
    query: String,
    record: EnrichmentRecord,
}

/// Durable key→record store with a retention window.
///
/// Writes to distinct keys land in distinct files, so concurrent writers to
/// different keys never conflict. Same-key write races are prevented by the
/// orchestrator's in-flight coalescing, not by locking here.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    retention: Duration,
}

impl FileCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, retention_hours: u64) -> Self {
        Self {
            dir: dir.into(),
            retention: Duration::hours(i64::try_from(retention_hours).unwrap_or(i64::MAX)),
        }
    }

    /// Trim + lowercase; the canonical cache key for a restaurant name.
    #[must_use]
    pub fn normalize_key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    #[must_use]
    pub fn retention_hours(&self) -> i64 {
        self.retention.num_hours()
    }

    fn path_for(&self, query: &str) -> PathBuf {
        let normalized = Self::normalize_key(query);
        let digest = Sha256::digest(normalized.as_bytes());
        self.dir.join(format!("{digest:x}.json"))
    }

    /// Returns the cached record for `query`, or `None` when the entry is
    /// missing, expired, or unreadable. Expired entries stay on disk and are
    /// overwritten by the next successful scrape.
    pub async fn get(&self, query: &str) -> Option<EnrichmentRecord> {
        let path = self.path_for(query);
        let bytes = tokio::fs::read(&path).await.ok()?;

        let envelope = match serde_json::from_slice::<CacheEnvelope>(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable cache entry; treating as miss");
                return None;
            }
        };

        if Utc::now() - envelope.cached_at > self.retention {
            tracing::debug!(query, "cache entry expired");
            return None;
        }

        Some(envelope.record)
    }

    /// Unconditional upsert — last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the directory cannot be created or the
    /// entry cannot be serialized or written. Callers treat this as
    /// non-fatal (the result is still served, just not cached).
    pub async fn put(&self, query: &str, record: &EnrichmentRecord) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let envelope = CacheEnvelope {
            cached_at: Utc::now(),
            query: query.to_owned(),
            record: record.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        tokio::fs::write(self.path_for(query), bytes).await?;
        Ok(())
    }

    /// Counts cached entries for the stats endpoint.
    pub async fn stats(&self) -> CacheStats {
        let entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(mut dir) => {
                let mut count = 0usize;
                while let Ok(Some(entry)) = dir.next_entry().await {
                    if entry.path().extension().is_some_and(|ext| ext == "json") {
                        count += 1;
                    }
                }
                count
            }
            Err(_) => 0,
        };
        CacheStats {
            entries,
            directory: self.dir.clone(),
        }
    }

    /// Drops every cached entry. Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the directory listing fails; individual
    /// file removals that race with writers are skipped.
    pub async fn clear(&self) -> Result<usize, CacheError> {
        let mut removed = 0usize;
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            // A cache directory that was never created has nothing to clear.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CacheError::Io(e)),
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && tokio::fs::remove_file(&path).await.is_ok()
            {
                removed += 1;
            }
        }
        Ok(removed)
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
