//! Run orchestration: one batch in, a ranked, duplicate-free batch plus
//! statistics out.

mod logging;
pub mod stats;

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use nf_core::fingerprint;
use nf_core::{Article, EngineConfig, Error, Fingerprint, FingerprintRecord, FingerprintStore, Result};
use nf_dedup::DuplicateDetector;
use nf_ranking::QualityScorer;

pub use logging::init_logging;
pub use stats::{QualityDistribution, RunStats};

/// What a run hands back to the caller.
#[derive(Debug)]
pub struct RunOutcome {
    pub articles: Vec<Article>,
    pub stats: RunStats,
}

pub struct Pipeline {
    config: EngineConfig,
    store: Arc<dyn FingerprintStore>,
    detector: DuplicateDetector,
    scorer: QualityScorer,
}

impl Pipeline {
    pub fn new(config: EngineConfig, store: Arc<dyn FingerprintStore>) -> Result<Self> {
        config.validate()?;
        let detector = DuplicateDetector::new(&config);
        let scorer = QualityScorer::new(&config);
        Ok(Self {
            config,
            store,
            detector,
            scorer,
        })
    }

    /// Process one batch: validate, fingerprint, dedup within the batch and
    /// against past runs, score, sort, and persist the survivors'
    /// fingerprints.
    pub async fn run(&self, batch: Vec<Article>) -> Result<RunOutcome> {
        let mut stats = RunStats::default();
        stats.total_articles = batch.len();
        info!("🔍 Deduplicating batch of {} articles", batch.len());

        let mut articles = Vec::with_capacity(batch.len());
        for mut article in batch {
            if article.title.trim().is_empty() || article.url.trim().is_empty() {
                return Err(Error::InvalidArticle(format!(
                    "missing title or url (url: '{}')",
                    article.url
                )));
            }
            fingerprint::annotate(&mut article);
            articles.push(article);
        }

        // Batch-internal duplicates resolve before any cross-run signal.
        let (survivors, decisions) = self.detector.dedup_batch(articles);
        for decision in &decisions {
            stats.count_layer(decision.layer);
        }

        let survivors = self.filter_cross_run(survivors, &mut stats).await;

        let mut ranked = Vec::with_capacity(survivors.len());
        let mut scores = Vec::with_capacity(survivors.len());
        for mut article in survivors {
            let breakdown = self.scorer.score(&article);
            debug!(
                "🏷️ {} scored {} (importance {}, content quality {})",
                article.title,
                breakdown.score,
                breakdown.importance,
                breakdown.content_quality()
            );
            article.quality_score = Some(breakdown.score);
            scores.push(breakdown.score);
            ranked.push(article);
        }
        stats.apply_scores(&scores);

        ranked.sort_by(|a, b| {
            b.quality_score
                .cmp(&a.quality_score)
                .then_with(|| b.published_at.cmp(&a.published_at))
        });

        self.commit_fingerprints(&ranked).await?;
        self.purge_expired().await;

        stats.finish();
        info!(
            "✅ Batch done: {} kept, {} removed ({} url / {} title / {} content / {} cross-run)",
            ranked.len(),
            stats.total_removed,
            stats.url_duplicates,
            stats.title_duplicates,
            stats.content_duplicates,
            stats.cross_run_duplicates
        );

        Ok(RunOutcome {
            articles: ranked,
            stats,
        })
    }

    /// Drop survivors whose fingerprint matches a past run. Storage failures
    /// degrade duplicate recall instead of halting the run.
    async fn filter_cross_run(&self, survivors: Vec<Article>, stats: &mut RunStats) -> Vec<Article> {
        let mut store_down = false;
        let mut filtered = Vec::with_capacity(survivors.len());

        for article in survivors {
            if store_down {
                filtered.push(article);
                continue;
            }
            match self.store.contains(&fingerprint_of(&article)).await {
                Ok(true) => {
                    debug!("🚫 cross-run duplicate: {}", article.title);
                    stats.cross_run_duplicates += 1;
                }
                Ok(false) => filtered.push(article),
                Err(e) => {
                    warn!("⚠️ Fingerprint store unavailable, skipping cross-run dedup: {}", e);
                    store_down = true;
                    filtered.push(article);
                }
            }
        }

        filtered
    }

    /// Persist the survivors' fingerprints in one transaction. A write
    /// conflict with a concurrent run must surface; anything else is logged
    /// and the run's output stands.
    async fn commit_fingerprints(&self, articles: &[Article]) -> Result<()> {
        if articles.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let records: Vec<FingerprintRecord> = articles
            .iter()
            .map(|article| FingerprintRecord::new(fingerprint_of(article), &article.source, now))
            .collect();

        match self.store.record_batch(&records).await {
            Ok(()) => {
                debug!("💾 Recorded {} fingerprints", records.len());
                Ok(())
            }
            Err(conflict @ Error::StoreWriteConflict(_)) => Err(conflict),
            Err(e) => {
                warn!("⚠️ Failed to record fingerprints, duplicate memory degraded: {}", e);
                Ok(())
            }
        }
    }

    async fn purge_expired(&self) {
        let cutoff = Utc::now() - Duration::days(i64::from(self.config.retention_days));
        match self.store.purge_older_than(cutoff).await {
            Ok(0) => {}
            Ok(removed) => info!("🧹 Purged {} expired fingerprints", removed),
            Err(e) => warn!("⚠️ Fingerprint purge failed: {}", e),
        }
    }
}

/// Reuse the hashes annotated during validation; recompute only if a caller
/// handed us an article that skipped annotation.
fn fingerprint_of(article: &Article) -> Fingerprint {
    match (&article.url_hash, &article.title_hash, &article.content_hash) {
        (Some(url_hash), Some(title_hash), Some(content_hash)) => Fingerprint {
            url_hash: url_hash.clone(),
            title_hash: title_hash.clone(),
            content_hash: content_hash.clone(),
        },
        _ => fingerprint::fingerprint(article),
    }
}
