use super::*;
use mealmap_core::EnrichmentRecord;
use tempfile::TempDir;

fn matched_record(query: &str) -> EnrichmentRecord {
    let mut record = EnrichmentRecord::unmatched(query, 0.9);
    record.matched = true;
    record.name = Some(format!("{query} (Central)"));
    record
}

#[tokio::test]
async fn round_trip_within_retention_returns_written_record() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), 168);

    let record = matched_record("KFC");
    cache.put("KFC", &record).await.unwrap();

    let read = cache.get("KFC").await.expect("expected cache hit");
    assert!(read.matched);
    assert_eq!(read.name.as_deref(), Some("KFC (Central)"));
}

#[tokio::test]
async fn key_is_normalized_before_lookup() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), 168);

    cache.put("  KFC  ", &matched_record("KFC")).await.unwrap();
    assert!(cache.get("kfc").await.is_some());
}

#[tokio::test]
async fn expired_entry_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    // Zero retention: every entry is expired as soon as it lands.
    let cache = FileCache::new(dir.path(), 0);

    cache.put("KFC", &matched_record("KFC")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    assert!(cache.get("KFC").await.is_none());
}

#[tokio::test]
async fn missing_entry_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), 168);
    assert!(cache.get("never written").await.is_none());
}

#[tokio::test]
async fn corrupt_entry_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), 168);

    cache.put("KFC", &matched_record("KFC")).await.unwrap();
    // Corrupt the single cache file in place.
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    let file = entries.next_entry().await.unwrap().unwrap();
    tokio::fs::write(file.path(), b"{ not json").await.unwrap();

    assert!(cache.get("KFC").await.is_none());
}

#[tokio::test]
async fn put_overwrites_existing_entry() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), 168);

    cache.put("KFC", &matched_record("KFC")).await.unwrap();
    let mut updated = matched_record("KFC");
    updated.name = Some("KFC (Mong Kok)".to_owned());
    cache.put("KFC", &updated).await.unwrap();

    let read = cache.get("KFC").await.unwrap();
    assert_eq!(read.name.as_deref(), Some("KFC (Mong Kok)"));
    assert_eq!(cache.stats().await.entries, 1);
}

#[tokio::test]
async fn stats_and_clear_cover_all_entries() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), 168);

    cache.put("A", &matched_record("A")).await.unwrap();
    cache.put("B", &matched_record("B")).await.unwrap();
    assert_eq!(cache.stats().await.entries, 2);

    let removed = cache.clear().await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(cache.stats().await.entries, 0);
    assert!(cache.get("A").await.is_none());
}

#[tokio::test]
async fn clear_on_missing_directory_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path().join("never-created"), 168);
    assert_eq!(cache.clear().await.unwrap(), 0);
}

#[tokio::test]
async fn concurrent_writes_to_distinct_keys_all_land() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), 168);

    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("restaurant-{i}");
            cache.put(&key, &matched_record(&key)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.stats().await.entries, 8);
}
