use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{Fingerprint, FingerprintRecord};
use crate::Result;

/// Persistent memory of previously accepted articles.
///
/// Implementations must serialize writers: `record_batch` applies all of a
/// run's fingerprints in one transaction, so an interrupted run leaves no
/// partial rows behind, and a concurrent writer surfaces
/// `Error::StoreWriteConflict` instead of corrupting the table.
#[async_trait]
pub trait FingerprintStore: Send + Sync {
    /// True when any one of the three hashes matches a stored record.
    async fn contains(&self, fingerprint: &Fingerprint) -> Result<bool>;

    /// Insert new records, or touch `last_seen_at` on ones already stored.
    async fn record_batch(&self, records: &[FingerprintRecord]) -> Result<()>;

    /// Delete records last seen before `cutoff`; returns how many went away.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// Number of stored fingerprints.
    async fn count(&self) -> Result<u64>;
}
