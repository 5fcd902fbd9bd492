use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use nf_core::{Fingerprint, FingerprintRecord, FingerprintStore, Result};

/// In-memory fingerprint store for tests and single-process runs.
///
/// Mirrors the SQLite layout: records keyed by the full triple plus one
/// lookup set per hash column.
#[derive(Default)]
struct MemoryIndex {
    records: HashMap<Fingerprint, FingerprintRecord>,
    url_hashes: HashSet<String>,
    title_hashes: HashSet<String>,
    content_hashes: HashSet<String>,
}

impl MemoryIndex {
    fn rebuild_hash_sets(&mut self) {
        self.url_hashes = self.records.keys().map(|fp| fp.url_hash.clone()).collect();
        self.title_hashes = self.records.keys().map(|fp| fp.title_hash.clone()).collect();
        self.content_hashes = self
            .records
            .keys()
            .map(|fp| fp.content_hash.clone())
            .collect();
    }
}

#[derive(Default)]
pub struct MemoryFingerprintStore {
    index: Arc<RwLock<MemoryIndex>>,
}

impl MemoryFingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FingerprintStore for MemoryFingerprintStore {
    async fn contains(&self, fingerprint: &Fingerprint) -> Result<bool> {
        let index = self.index.read().await;
        Ok(index.url_hashes.contains(&fingerprint.url_hash)
            || index.title_hashes.contains(&fingerprint.title_hash)
            || index.content_hashes.contains(&fingerprint.content_hash))
    }

    async fn record_batch(&self, records: &[FingerprintRecord]) -> Result<()> {
        let mut index = self.index.write().await;
        for record in records {
            let key = record.fingerprint();
            if let Some(existing) = index.records.get_mut(&key) {
                existing.last_seen_at = record.last_seen_at;
                continue;
            }
            index.url_hashes.insert(key.url_hash.clone());
            index.title_hashes.insert(key.title_hash.clone());
            index.content_hashes.insert(key.content_hash.clone());
            index.records.insert(key, record.clone());
        }
        Ok(())
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut index = self.index.write().await;
        let before = index.records.len();
        index.records.retain(|_, record| record.last_seen_at >= cutoff);
        let removed = before - index.records.len();
        if removed > 0 {
            index.rebuild_hash_sets();
        }
        Ok(removed as u64)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.index.read().await.records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(seed: &str, seen_at: DateTime<Utc>) -> FingerprintRecord {
        FingerprintRecord::new(
            Fingerprint {
                url_hash: format!("url-{}", seed),
                title_hash: format!("title-{}", seed),
                content_hash: format!("content-{}", seed),
            },
            "test source",
            seen_at,
        )
    }

    #[tokio::test]
    async fn any_hash_match_is_a_hit() {
        let store = MemoryFingerprintStore::new();
        store.record_batch(&[record("a", Utc::now())]).await.unwrap();

        let content_only = Fingerprint {
            url_hash: "url-z".to_string(),
            title_hash: "title-z".to_string(),
            content_hash: "content-a".to_string(),
        };
        assert!(store.contains(&content_only).await.unwrap());
    }

    #[tokio::test]
    async fn touch_updates_last_seen_in_place() {
        let store = MemoryFingerprintStore::new();
        let early = Utc::now() - Duration::days(5);
        store.record_batch(&[record("a", early)]).await.unwrap();
        store.record_batch(&[record("a", Utc::now())]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let cutoff = Utc::now() - Duration::days(1);
        assert_eq!(store.purge_older_than(cutoff).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn purge_drops_hash_lookups_too() {
        let store = MemoryFingerprintStore::new();
        store
            .record_batch(&[record("stale", Utc::now() - Duration::days(45))])
            .await
            .unwrap();

        let cutoff = Utc::now() - Duration::days(30);
        assert_eq!(store.purge_older_than(cutoff).await.unwrap(), 1);
        assert!(!store
            .contains(&record("stale", Utc::now()).fingerprint())
            .await
            .unwrap());
    }
}
