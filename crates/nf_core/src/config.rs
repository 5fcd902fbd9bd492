use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEFAULT_BREAKING_KEYWORDS: &[&str] = &[
    "breaking", "urgent", "alert", "emergency", "crisis", "disaster", "war", "attack", "bomb",
    "terror", "earthquake", "tsunami", "pandemic", "outbreak", "death", "killed", "died",
    "accident", "fire", "explosion", "crash", "rescue", "evacuation",
];

const DEFAULT_POLITICAL_KEYWORDS: &[&str] = &[
    "election", "prime minister", "president", "government", "parliament", "budget", "policy",
    "law", "court", "supreme court", "verdict", "resignation", "appointed", "cabinet", "minister",
    "opposition",
];

const DEFAULT_SOCIAL_KEYWORDS: &[&str] = &[
    "protest", "strike", "rally", "demonstration", "movement", "festival", "celebration", "award",
    "achievement", "record", "innovation", "breakthrough", "discovery", "launch", "announcement",
];

const DEFAULT_REGIONAL_KEYWORDS: &[&str] = &[
    "bengaluru", "bangalore", "karnataka", "india", "indian", "mumbai", "delhi", "chennai",
    "hyderabad", "pune", "kolkata",
];

const DEFAULT_TRUSTED_SOURCES: &[&str] = &[
    "reuters",
    "bbc",
    "cnn",
    "ap news",
    "npr",
    "bloomberg",
    "times of india",
    "hindustan times",
    "indian express",
    "ndtv",
    "news18",
    "zee news",
    "deccan herald",
    "the hindu",
    "economic times",
    "business standard",
    "mint",
    "livemint",
    "the guardian",
    "washington post",
    "new york times",
];

fn default_url_threshold() -> f64 {
    0.90
}

fn default_title_threshold() -> f64 {
    0.85
}

fn default_content_threshold() -> f64 {
    0.75
}

fn default_retention_days() -> u32 {
    30
}

fn default_breaking_keywords() -> Vec<String> {
    DEFAULT_BREAKING_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_political_keywords() -> Vec<String> {
    DEFAULT_POLITICAL_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_social_keywords() -> Vec<String> {
    DEFAULT_SOCIAL_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_regional_keywords() -> Vec<String> {
    DEFAULT_REGIONAL_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_trusted_sources() -> Vec<String> {
    DEFAULT_TRUSTED_SOURCES.iter().map(|s| s.to_string()).collect()
}

/// Named configuration surface for the whole engine.
///
/// All fields have sensible defaults; `validate` must pass before a pipeline
/// is built around the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_url_threshold")]
    pub url_similarity_threshold: f64,
    #[serde(default = "default_title_threshold")]
    pub title_similarity_threshold: f64,
    #[serde(default = "default_content_threshold")]
    pub content_similarity_threshold: f64,
    /// Fingerprints unseen for this many whole days are purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_breaking_keywords")]
    pub breaking_keywords: Vec<String>,
    #[serde(default = "default_political_keywords")]
    pub political_keywords: Vec<String>,
    #[serde(default = "default_social_keywords")]
    pub social_keywords: Vec<String>,
    #[serde(default = "default_regional_keywords")]
    pub regional_keywords: Vec<String>,
    #[serde(default = "default_trusted_sources")]
    pub trusted_sources: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url_similarity_threshold: default_url_threshold(),
            title_similarity_threshold: default_title_threshold(),
            content_similarity_threshold: default_content_threshold(),
            retention_days: default_retention_days(),
            breaking_keywords: default_breaking_keywords(),
            political_keywords: default_political_keywords(),
            social_keywords: default_social_keywords(),
            regional_keywords: default_regional_keywords(),
            trusted_sources: default_trusted_sources(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("url_similarity_threshold", self.url_similarity_threshold),
            ("title_similarity_threshold", self.title_similarity_threshold),
            (
                "content_similarity_threshold",
                self.content_similarity_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(Error::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.retention_days == 0 {
            return Err(Error::InvalidConfig(
                "retention_days must be at least one day".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let mut config = EngineConfig::default();
        config.title_similarity_threshold = 1.2;
        assert!(config.validate().is_err());

        config.title_similarity_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_retention() {
        let mut config = EngineConfig::default();
        config.retention_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.url_similarity_threshold, 0.90);
        assert_eq!(config.retention_days, 30);
        assert!(config.trusted_sources.iter().any(|s| s == "reuters"));
    }
}
