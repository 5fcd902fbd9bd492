use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate news item as handed over by the fetch stage.
///
/// Only `title` and `url` are required for an article to enter the engine;
/// everything else degrades scoring and duplicate recall when absent. The
/// trailing fields are populated by the engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,

    // Derived fields, filled in during a run.
    #[serde(default)]
    pub normalized_url: Option<String>,
    #[serde(default)]
    pub url_hash: Option<String>,
    #[serde(default)]
    pub title_hash: Option<String>,
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub quality_score: Option<u32>,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            summary: None,
            description: None,
            content: None,
            source: String::new(),
            category: None,
            published_at: None,
            image_url: None,
            normalized_url: None,
            url_hash: None,
            title_hash: None,
            content_hash: None,
            quality_score: None,
        }
    }

    /// Longest available body text: full content, then summary, then the
    /// feed-provided description.
    pub fn body_text(&self) -> &str {
        for candidate in [&self.content, &self.summary, &self.description] {
            if let Some(text) = candidate {
                if !text.trim().is_empty() {
                    return text;
                }
            }
        }
        ""
    }
}

/// The triple identifying an article across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub url_hash: String,
    pub title_hash: String,
    pub content_hash: String,
}

/// Persisted form of a fingerprint, one row per previously accepted article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    pub url_hash: String,
    pub title_hash: String,
    pub content_hash: String,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub source: String,
}

impl FingerprintRecord {
    pub fn new(fingerprint: Fingerprint, source: &str, seen_at: DateTime<Utc>) -> Self {
        Self {
            url_hash: fingerprint.url_hash,
            title_hash: fingerprint.title_hash,
            content_hash: fingerprint.content_hash,
            first_seen_at: seen_at,
            last_seen_at: seen_at,
            source: source.to_string(),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            url_hash: self.url_hash.clone(),
            title_hash: self.title_hash.clone(),
            content_hash: self.content_hash.clone(),
        }
    }
}

/// Which comparison layer decided a pair was duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateLayer {
    Url,
    Title,
    Content,
}

impl std::fmt::Display for DuplicateLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateLayer::Url => write!(f, "url"),
            DuplicateLayer::Title => write!(f, "title"),
            DuplicateLayer::Content => write!(f, "content"),
        }
    }
}

/// Audit record for one duplicate pair found inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateDecision {
    pub kept_url: String,
    pub dropped_url: String,
    pub layer: DuplicateLayer,
    pub similarity: f64,
}

/// Per-article scoring breakdown, attached to survivors for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub importance: u32,
    pub regional_bonus: u32,
    pub title_quality: u32,
    pub summary_quality: u32,
    pub image_quality: u32,
    pub description_quality: u32,
    pub trusted_source: bool,
    pub score: u32,
}

impl QualityBreakdown {
    pub fn content_quality(&self) -> u32 {
        self.title_quality + self.summary_quality + self.image_quality + self.description_quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_text_prefers_content() {
        let mut article = Article::new("Title", "http://example.com/a");
        article.description = Some("short blurb".to_string());
        article.content = Some("the full story".to_string());
        assert_eq!(article.body_text(), "the full story");
    }

    #[test]
    fn body_text_falls_back_past_blank_fields() {
        let mut article = Article::new("Title", "http://example.com/a");
        article.content = Some("   ".to_string());
        article.summary = Some("a summary".to_string());
        assert_eq!(article.body_text(), "a summary");
    }

    #[test]
    fn body_text_empty_when_nothing_set() {
        let article = Article::new("Title", "http://example.com/a");
        assert_eq!(article.body_text(), "");
    }
}
