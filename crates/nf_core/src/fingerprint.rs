//! Stable article fingerprints for cross-run duplicate suppression.

use sha2::{Digest, Sha256};

use crate::normalize::{canonicalize_url, normalize_content, normalize_title_for_hash};
use crate::types::{Article, Fingerprint};

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compute an article's fingerprint from its canonical URL, normalized title,
/// and normalized title+body content.
///
/// The content digest covers the title as well; articles with no body at all
/// would otherwise collapse onto the hash of the empty string and wrongly
/// match each other across runs.
pub fn fingerprint(article: &Article) -> Fingerprint {
    let canonical_url = match &article.normalized_url {
        Some(existing) => existing.clone(),
        None => canonicalize_url(&article.url),
    };
    let title = normalize_title_for_hash(&article.title);
    let body = normalize_content(article.body_text());

    Fingerprint {
        url_hash: sha256_hex(&canonical_url),
        title_hash: sha256_hex(&title),
        content_hash: sha256_hex(&format!("{}|{}", title, body)),
    }
}

/// Fill in the derived fields on an article: `normalized_url` and the three
/// fingerprint hashes. Idempotent.
pub fn annotate(article: &mut Article) {
    if article.normalized_url.is_none() {
        article.normalized_url = Some(canonicalize_url(&article.url));
    }
    let fp = fingerprint(article);
    article.url_hash = Some(fp.url_hash);
    article.title_hash = Some(fp.title_hash);
    article.content_hash = Some(fp.content_hash);
}
