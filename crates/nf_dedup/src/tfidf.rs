//! TF-IDF content similarity over a two-document corpus.
//!
//! Terms are unigrams and bigrams of lower-cased alphanumeric tokens with
//! English stop-words removed, vocabulary capped at the most frequent 1000
//! terms. Weights use smoothed inverse document frequency; the result is the
//! cosine of the two weight vectors.

use std::collections::HashMap;

const MAX_TERMS: usize = 1000;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                current.push(lower);
            }
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Unigrams plus bigrams over the stop-word-filtered token stream.
fn extract_terms(text: &str) -> Vec<String> {
    let tokens: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|token| !is_stop_word(token))
        .collect();

    let mut terms = Vec::with_capacity(tokens.len() * 2);
    terms.extend(tokens.iter().cloned());
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// Cosine similarity of the two documents in [0, 1], or `None` when either
/// side yields no usable vocabulary (the inconclusive case).
pub fn similarity(doc_a: &str, doc_b: &str) -> Option<f64> {
    let terms_a = extract_terms(doc_a);
    let terms_b = extract_terms(doc_b);
    if terms_a.is_empty() || terms_b.is_empty() {
        return None;
    }

    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for term in terms_a {
        counts.entry(term).or_default().0 += 1;
    }
    for term in terms_b {
        counts.entry(term).or_default().1 += 1;
    }

    // Keep the top MAX_TERMS by corpus frequency; ties break on the term so
    // the vocabulary is deterministic.
    let mut vocabulary: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    vocabulary.sort_by(|(term_a, tf_a), (term_b, tf_b)| {
        let freq_a = tf_a.0 + tf_a.1;
        let freq_b = tf_b.0 + tf_b.1;
        freq_b.cmp(&freq_a).then_with(|| term_a.cmp(term_b))
    });
    vocabulary.truncate(MAX_TERMS);

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (_, (tf_a, tf_b)) in &vocabulary {
        let documents_with_term = usize::from(*tf_a > 0) + usize::from(*tf_b > 0);
        // Smoothed IDF over the two-document corpus.
        let idf = (3.0 / (1.0 + documents_with_term as f64)).ln() + 1.0;
        let weight_a = *tf_a as f64 * idf;
        let weight_b = *tf_b as f64 * idf;
        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_score_one() {
        let text = "a major earthquake struck the capital city early on tuesday morning";
        let score = similarity(text, text).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unrelated_documents_score_near_zero() {
        let a = "earthquake rescue teams search collapsed buildings downtown";
        let b = "cricket team wins championship trophy final match";
        let score = similarity(a, b).unwrap();
        assert!(score < 0.1, "score={}", score);
    }

    #[test]
    fn paraphrased_documents_score_high() {
        let a = "major earthquake strikes capital city, rescue teams deployed to collapsed buildings";
        let b = "rescue teams deployed after major earthquake strikes the capital city";
        let score = similarity(a, b).unwrap();
        assert!(score > 0.6, "score={}", score);
        assert!(score < 1.0, "score={}", score);
    }

    #[test]
    fn near_identical_documents_clear_the_default_threshold() {
        let a = "major earthquake strikes capital city overnight, rescue teams search collapsed buildings for survivors";
        let b = "major earthquake strikes capital city overnight, rescue teams search collapsed buildings for victims";
        let score = similarity(a, b).unwrap();
        assert!(score >= 0.75, "score={}", score);
    }

    #[test]
    fn empty_document_is_inconclusive() {
        assert!(similarity("", "some real content here").is_none());
    }

    #[test]
    fn stop_word_only_document_is_inconclusive() {
        assert!(similarity("the of and to", "some real content here").is_none());
    }

    #[test]
    fn stop_words_are_sorted_for_binary_search() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS);
    }
}
