//! URL layer comparison: exact canonical equality first, fuzzy only when the
//! cheap check fails.

use crate::fuzzy;

/// Compare two canonicalized URLs. Returns the similarity when they identify
/// the same story (1.0 for exact equality, the fuzzy ratio when it clears
/// `threshold`), `None` otherwise.
pub fn same_story(canonical_a: &str, canonical_b: &str, threshold: f64) -> Option<f64> {
    if canonical_a == canonical_b {
        return Some(1.0);
    }

    let similarity = fuzzy::ratio(canonical_a, canonical_b);
    if similarity >= threshold {
        Some(similarity)
    } else {
        None
    }
}
