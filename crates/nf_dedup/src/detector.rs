//! Layered duplicate detection over one batch of articles.
//!
//! Layers run cheapest first: canonical URL equality, fuzzy URL ratio, fuzzy
//! title ratio, then TF-IDF content similarity. A later layer only runs when
//! every earlier one was inconclusive.

use tracing::debug;

use nf_core::normalize::{canonicalize_url, normalize_title_for_match};
use nf_core::{Article, DuplicateDecision, DuplicateLayer, EngineConfig};

use crate::{fuzzy, tfidf, urls};

/// Bodies shorter than this are too thin for the content layer to say
/// anything useful about.
const MIN_BODY_CHARS: usize = 20;

pub struct DuplicateDetector {
    url_threshold: f64,
    title_threshold: f64,
    content_threshold: f64,
}

impl DuplicateDetector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            url_threshold: config.url_similarity_threshold,
            title_threshold: config.title_similarity_threshold,
            content_threshold: config.content_similarity_threshold,
        }
    }

    /// Decide whether `a` and `b` cover the same story. Returns the layer
    /// that fired and its similarity, or `None` for distinct articles.
    pub fn compare(&self, a: &Article, b: &Article) -> Option<(DuplicateLayer, f64)> {
        let url_a = canonical_url(a);
        let url_b = canonical_url(b);
        if let Some(similarity) = urls::same_story(&url_a, &url_b, self.url_threshold) {
            return Some((DuplicateLayer::Url, similarity));
        }

        let title_a = normalize_title_for_match(&a.title);
        let title_b = normalize_title_for_match(&b.title);
        let title_similarity =
            fuzzy::ratio(&title_a, &title_b).max(fuzzy::token_sort_ratio(&title_a, &title_b));
        if title_similarity >= self.title_threshold {
            return Some((DuplicateLayer::Title, title_similarity));
        }

        if has_substantial_body(a) && has_substantial_body(b) {
            let doc_a = content_document(a);
            let doc_b = content_document(b);
            // An inconclusive content comparison falls back to the title
            // verdict, which already failed to fire.
            if let Some(similarity) = tfidf::similarity(&doc_a, &doc_b) {
                if similarity >= self.content_threshold {
                    return Some((DuplicateLayer::Content, similarity));
                }
            }
        }

        None
    }

    /// Pairwise dedup across a batch. The first-seen article of every
    /// duplicate pair is kept as-is; provenance is not merged.
    pub fn dedup_batch(&self, articles: Vec<Article>) -> (Vec<Article>, Vec<DuplicateDecision>) {
        let mut kept: Vec<Article> = Vec::with_capacity(articles.len());
        let mut decisions = Vec::new();

        'candidates: for article in articles {
            for existing in &kept {
                if let Some((layer, similarity)) = self.compare(existing, &article) {
                    debug!(
                        "🚫 {} duplicate ({:.2}): '{}' repeats '{}'",
                        layer, similarity, article.title, existing.title
                    );
                    decisions.push(DuplicateDecision {
                        kept_url: existing.url.clone(),
                        dropped_url: article.url.clone(),
                        layer,
                        similarity,
                    });
                    continue 'candidates;
                }
            }
            kept.push(article);
        }

        (kept, decisions)
    }
}

fn canonical_url(article: &Article) -> String {
    match &article.normalized_url {
        Some(existing) => existing.clone(),
        None => canonicalize_url(&article.url),
    }
}

fn has_substantial_body(article: &Article) -> bool {
    article.body_text().trim().chars().count() >= MIN_BODY_CHARS
}

/// Document fed to the content layer: the title counts double.
fn content_document(article: &Article) -> String {
    format!("{} {} {}", article.title, article.title, article.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> DuplicateDetector {
        DuplicateDetector::new(&EngineConfig::default())
    }

    fn article(title: &str, url: &str) -> Article {
        Article::new(title, url)
    }

    #[test]
    fn identical_normalized_urls_are_duplicates_regardless_of_title() {
        let a = article("Earthquake strikes capital", "http://a.com/1");
        let b = article("Major earthquake hits capital city", "http://a.com/1?utm=x");
        let (layer, similarity) = detector().compare(&a, &b).unwrap();
        assert_eq!(layer, DuplicateLayer::Url);
        assert_eq!(similarity, 1.0);
    }

    #[test]
    fn reordered_titles_are_title_duplicates() {
        let a = article("Budget 2024 announced by government", "http://a.com/1");
        let b = article("Government announces Budget 2024", "http://b.com/2");
        let (layer, similarity) = detector().compare(&a, &b).unwrap();
        assert_eq!(layer, DuplicateLayer::Title);
        assert!(similarity >= 0.85);
    }

    #[test]
    fn title_threshold_boundary_is_inclusive() {
        // These titles share a 17-char block over a combined length of 40,
        // a ratio of exactly 0.85.
        let a = article("abcdefghijklmnopqrst", "http://a.com/first-long-slug");
        let b = article("abcdefghijklmnopqxyz", "http://b.org/second-other-slug");
        let (layer, similarity) = detector().compare(&a, &b).unwrap();
        assert_eq!(layer, DuplicateLayer::Title);
        assert_eq!(similarity, 0.85);

        // One fewer matching char drops below the threshold.
        let c = article("abcdefghijklmnopwxyz", "http://b.org/second-other-slug");
        assert!(detector().compare(&a, &c).is_none());
    }

    #[test]
    fn title_ratio_below_threshold_is_not_a_duplicate() {
        let a = article("Budget 2024 announced by government", "http://a.com/1");
        let b = article("Cricket team wins championship final", "http://b.com/2");
        assert!(detector().compare(&a, &b).is_none());
    }

    #[test]
    fn syndicated_bodies_are_content_duplicates() {
        // Same wire copy under outlet-specific headlines. The title layer is
        // pushed out of the way so the content layer has to decide.
        let mut config = EngineConfig::default();
        config.title_similarity_threshold = 0.99;
        let detector = DuplicateDetector::new(&config);

        let body = "Rescue crews worked through the night pulling people from collapsed \
                    apartment blocks after the quake flattened neighborhoods across the \
                    capital region, officials said on Tuesday.";
        let mut a = article("Major earthquake strikes capital city overnight", "http://a.com/1");
        a.content = Some(body.to_string());
        let mut b = article("Major earthquake strikes the capital overnight", "http://b.com/2");
        b.content = Some(body.to_string());

        let (layer, similarity) = detector.compare(&a, &b).unwrap();
        assert_eq!(layer, DuplicateLayer::Content);
        assert!(similarity >= 0.75, "similarity={}", similarity);
    }

    #[test]
    fn thin_bodies_never_reach_the_content_layer() {
        let mut a = article("First headline entirely", "http://a.com/1");
        a.content = Some("too short".to_string());
        let mut b = article("Second headline entirely", "http://b.com/2");
        b.content = Some("too short".to_string());
        assert!(detector().compare(&a, &b).is_none());
    }

    #[test]
    fn first_seen_article_wins_in_a_batch() {
        let first = article("Earthquake strikes capital", "http://a.com/1");
        let mut second = article("Earthquake strikes capital", "http://b.com/other");
        second.source = "other outlet".to_string();

        let (kept, decisions) = detector().dedup_batch(vec![first, second]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "http://a.com/1");
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].layer, DuplicateLayer::Title);
        assert_eq!(decisions[0].dropped_url, "http://b.com/other");
    }

    #[test]
    fn dedup_is_idempotent() {
        let batch = vec![
            article("Earthquake strikes capital", "http://a.com/1"),
            article("Earthquake strikes capital city", "http://b.com/2"),
            article("Cricket team wins championship final", "http://c.com/3"),
        ];

        let (first_pass, _) = detector().dedup_batch(batch);
        let urls: Vec<String> = first_pass.iter().map(|a| a.url.clone()).collect();
        let (second_pass, decisions) = detector().dedup_batch(first_pass);
        let urls_again: Vec<String> = second_pass.iter().map(|a| a.url.clone()).collect();

        assert_eq!(urls, urls_again);
        assert!(decisions.is_empty());
    }
}
