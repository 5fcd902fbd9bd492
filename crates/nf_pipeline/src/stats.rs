use serde::{Deserialize, Serialize};

use nf_core::DuplicateLayer;

/// How many survivors landed in each quality band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityDistribution {
    /// score >= 700
    pub high: usize,
    /// 400 <= score < 700
    pub medium: usize,
    /// score < 400
    pub low: usize,
}

/// Everything one run removed and ranked, as an explicit value object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub total_articles: usize,
    pub url_duplicates: usize,
    pub title_duplicates: usize,
    pub content_duplicates: usize,
    pub cross_run_duplicates: usize,
    pub total_removed: usize,
    pub quality_distribution: QualityDistribution,
    pub average_score: f64,
    pub max_score: u32,
    pub min_score: u32,
}

impl RunStats {
    pub fn count_layer(&mut self, layer: DuplicateLayer) {
        match layer {
            DuplicateLayer::Url => self.url_duplicates += 1,
            DuplicateLayer::Title => self.title_duplicates += 1,
            DuplicateLayer::Content => self.content_duplicates += 1,
        }
    }

    /// Fold the survivors' scores into the distribution and summary figures.
    pub fn apply_scores(&mut self, scores: &[u32]) {
        for &score in scores {
            if score >= 700 {
                self.quality_distribution.high += 1;
            } else if score >= 400 {
                self.quality_distribution.medium += 1;
            } else {
                self.quality_distribution.low += 1;
            }
        }

        if scores.is_empty() {
            return;
        }
        let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
        self.average_score = sum as f64 / scores.len() as f64;
        self.max_score = scores.iter().copied().max().unwrap_or(0);
        self.min_score = scores.iter().copied().min().unwrap_or(0);
    }

    pub fn finish(&mut self) {
        self.total_removed = self.url_duplicates
            + self.title_duplicates
            + self.content_duplicates
            + self.cross_run_duplicates;
    }
}
