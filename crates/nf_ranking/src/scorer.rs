//! Multi-factor quality scoring.
//!
//! Each surviving article gets a bounded importance score: a keyword-tier
//! base, a regional bonus, a 0-300 content-quality subscore, and a trust
//! multiplier for vetted outlets, clamped to 1000.

use url::Url;

use nf_core::{Article, EngineConfig, QualityBreakdown};

const BREAKING_TIER: u32 = 900;
const POLITICAL_TIER: u32 = 700;
const SOCIAL_TIER: u32 = 500;
const REGIONAL_BONUS: u32 = 200;
const MAX_SCORE: u32 = 1000;
const TRUSTED_MULTIPLIER: f64 = 1.5;

/// Hosting path fragments that suggest a real image CDN rather than an
/// arbitrary link.
const IMAGE_HOST_HINTS: &[&str] = &["cdn", "static", "images", "img", "media"];

pub struct QualityScorer {
    breaking_keywords: Vec<String>,
    political_keywords: Vec<String>,
    social_keywords: Vec<String>,
    regional_keywords: Vec<String>,
    trusted_sources: Vec<String>,
}

impl QualityScorer {
    pub fn new(config: &EngineConfig) -> Self {
        let lowered = |keywords: &[String]| -> Vec<String> {
            keywords.iter().map(|k| k.to_lowercase()).collect()
        };
        Self {
            breaking_keywords: lowered(&config.breaking_keywords),
            political_keywords: lowered(&config.political_keywords),
            social_keywords: lowered(&config.social_keywords),
            regional_keywords: lowered(&config.regional_keywords),
            trusted_sources: lowered(&config.trusted_sources),
        }
    }

    /// Score one article. Pure; the result is attached to the article by the
    /// pipeline, not here.
    pub fn score(&self, article: &Article) -> QualityBreakdown {
        let full_text = format!(
            "{} {} {}",
            article.title,
            article.summary.as_deref().unwrap_or_default(),
            article.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        let importance = self.importance(&full_text);
        let regional_bonus = if contains_any(&full_text, &self.regional_keywords) {
            REGIONAL_BONUS
        } else {
            0
        };

        let title_quality = title_quality(&article.title);
        let summary_quality = summary_quality(article.summary.as_deref());
        let image_quality = image_quality(article.image_url.as_deref());
        let description_quality = description_quality(article.description.as_deref());

        let trusted_source = self.is_trusted(&article.source);
        let multiplier = if trusted_source { TRUSTED_MULTIPLIER } else { 1.0 };

        let subtotal = importance
            + regional_bonus
            + title_quality
            + summary_quality
            + image_quality
            + description_quality;
        let score = ((subtotal as f64 * multiplier).round() as u32).min(MAX_SCORE);

        QualityBreakdown {
            importance,
            regional_bonus,
            title_quality,
            summary_quality,
            image_quality,
            description_quality,
            trusted_source,
            score,
        }
    }

    /// Highest matching tier wins, checked breaking first.
    fn importance(&self, full_text: &str) -> u32 {
        if contains_any(full_text, &self.breaking_keywords) {
            BREAKING_TIER
        } else if contains_any(full_text, &self.political_keywords) {
            POLITICAL_TIER
        } else if contains_any(full_text, &self.social_keywords) {
            SOCIAL_TIER
        } else {
            0
        }
    }

    fn is_trusted(&self, source: &str) -> bool {
        if source.is_empty() {
            return false;
        }
        let source = source.to_lowercase();
        self.trusted_sources
            .iter()
            .any(|trusted| source.contains(trusted.as_str()))
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

/// 0-80 points for headline structure; 5-15 words reads like a real headline.
fn title_quality(title: &str) -> u32 {
    if title.trim().len() <= 10 {
        return 0;
    }
    let words = title.split_whitespace().count();
    if (5..=15).contains(&words) {
        80
    } else if words > 3 {
        60
    } else {
        20
    }
}

/// 0-120 points; 30-80 words is the sweet spot for a usable summary.
fn summary_quality(summary: Option<&str>) -> u32 {
    let Some(summary) = summary else { return 0 };
    if summary.trim().is_empty() {
        return 0;
    }
    let words = summary.split_whitespace().count();
    if (30..=80).contains(&words) {
        120
    } else if words >= 15 {
        80
    } else {
        40
    }
}

/// 0-60 points for a well-formed image link; known CDN-ish hosting scores
/// full marks, placeholders score nothing.
fn image_quality(image_url: Option<&str>) -> u32 {
    let Some(image_url) = image_url else { return 0 };
    let lowered = image_url.to_lowercase();
    if lowered.contains("placeholder") || Url::parse(image_url).is_err() {
        return 0;
    }
    if IMAGE_HOST_HINTS.iter().any(|hint| lowered.contains(hint)) {
        60
    } else {
        40
    }
}

/// 0-40 points for a feed description worth showing.
fn description_quality(description: Option<&str>) -> u32 {
    let Some(description) = description else { return 0 };
    let trimmed = description.trim();
    if trimmed.len() > 20 {
        40
    } else if !trimmed.is_empty() {
        20
    } else {
        0
    }
}
