use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use nf_core::{Error, Fingerprint, FingerprintRecord, FingerprintStore, Result};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS fingerprints (
        url_hash TEXT NOT NULL,
        title_hash TEXT NOT NULL,
        content_hash TEXT NOT NULL,
        first_seen_at TEXT NOT NULL,
        last_seen_at TEXT NOT NULL,
        source TEXT NOT NULL,
        PRIMARY KEY (url_hash, title_hash, content_hash)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_fingerprints_url_hash ON fingerprints (url_hash)",
    "CREATE INDEX IF NOT EXISTS idx_fingerprints_title_hash ON fingerprints (title_hash)",
    "CREATE INDEX IF NOT EXISTS idx_fingerprints_content_hash ON fingerprints (content_hash)",
];

/// File-backed fingerprint store. One table, one independent index per hash
/// column so any single hash match suffices.
pub struct SqliteFingerprintStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteFingerprintStore {
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[async_trait]
impl FingerprintStore for SqliteFingerprintStore {
    async fn contains(&self, fingerprint: &Fingerprint) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS matches FROM fingerprints
            WHERE url_hash = ? OR title_hash = ? OR content_hash = ?
            "#,
        )
        .bind(&fingerprint.url_hash)
        .bind(&fingerprint.title_hash)
        .bind(&fingerprint.content_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        let matches: i64 = row.get("matches");
        Ok(matches > 0)
    }

    async fn record_batch(&self, records: &[FingerprintRecord]) -> Result<()> {
        // One transaction per run: either every fingerprint lands or none do.
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO fingerprints
                (url_hash, title_hash, content_hash, first_seen_at, last_seen_at, source)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (url_hash, title_hash, content_hash)
                DO UPDATE SET last_seen_at = excluded.last_seen_at
                "#,
            )
            .bind(&record.url_hash)
            .bind(&record.title_hash)
            .bind(&record.content_hash)
            .bind(encode_time(record.first_seen_at))
            .bind(encode_time(record.last_seen_at))
            .bind(&record.source)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        }

        tx.commit().await.map_err(storage_error)
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM fingerprints WHERE last_seen_at < ?")
            .bind(encode_time(cutoff))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM fingerprints")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        let total: i64 = row.get("total");
        Ok(total as u64)
    }
}

/// Fixed-width RFC 3339 so stored timestamps compare chronologically as text.
fn encode_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn storage_error(error: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_error) = &error {
        let message = db_error.message().to_lowercase();
        if message.contains("locked") || message.contains("busy") {
            return Error::StoreWriteConflict(db_error.message().to_string());
        }
    }
    Error::Storage(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

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
    async fn lookup_matches_on_any_single_hash() {
        let dir = tempdir().unwrap();
        let store = SqliteFingerprintStore::open(&dir.path().join("fp.db"))
            .await
            .unwrap();

        let stored = record("a", Utc::now());
        store.record_batch(&[stored.clone()]).await.unwrap();

        let title_only = Fingerprint {
            url_hash: "url-other".to_string(),
            title_hash: stored.title_hash.clone(),
            content_hash: "content-other".to_string(),
        };
        assert!(store.contains(&title_only).await.unwrap());

        let no_match = Fingerprint {
            url_hash: "url-x".to_string(),
            title_hash: "title-x".to_string(),
            content_hash: "content-x".to_string(),
        };
        assert!(!store.contains(&no_match).await.unwrap());
    }

    #[tokio::test]
    async fn upsert_touches_last_seen_without_duplicating_rows() {
        let dir = tempdir().unwrap();
        let store = SqliteFingerprintStore::open(&dir.path().join("fp.db"))
            .await
            .unwrap();

        let first_seen = Utc::now() - Duration::days(2);
        store.record_batch(&[record("a", first_seen)]).await.unwrap();
        store.record_batch(&[record("a", Utc::now())]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);

        // The touched record survives a purge that would have caught the
        // original timestamp.
        let cutoff = Utc::now() - Duration::days(1);
        assert_eq!(store.purge_older_than(cutoff).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn purge_removes_expired_records() {
        let dir = tempdir().unwrap();
        let store = SqliteFingerprintStore::open(&dir.path().join("fp.db"))
            .await
            .unwrap();

        store
            .record_batch(&[
                record("old", Utc::now() - Duration::days(40)),
                record("fresh", Utc::now()),
            ])
            .await
            .unwrap();

        let cutoff = Utc::now() - Duration::days(30);
        assert_eq!(store.purge_older_than(cutoff).await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);

        let fresh = record("fresh", Utc::now());
        assert!(store.contains(&fresh.fingerprint()).await.unwrap());
        let old = record("old", Utc::now());
        assert!(!store.contains(&old.fingerprint()).await.unwrap());
    }

    #[tokio::test]
    async fn reopening_the_database_keeps_fingerprints() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fp.db");

        {
            let store = SqliteFingerprintStore::open(&path).await.unwrap();
            store.record_batch(&[record("a", Utc::now())]).await.unwrap();
        }

        let reopened = SqliteFingerprintStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        assert!(reopened
            .contains(&record("a", Utc::now()).fingerprint())
            .await
            .unwrap());
    }
}
