//! Token-set similarity measures.

use std::collections::HashSet;

/// Distinct case-folded alphanumeric runs.
pub fn token_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Overlap coefficient: `|A ∩ B| / min(|A|, |B|)` on distinct tokens.
/// 0.0 when either side has no tokens.
pub fn overlap_coefficient(doc1: &str, doc2: &str) -> f64 {
    let a = token_set(doc1);
    let b = token_set(doc2);
    let smallest = a.len().min(b.len());
    if smallest == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / smallest as f64
}

/// Jaccard index: `|A ∩ B| / |A ∪ B|` on distinct tokens.
pub fn jaccard_similarity(doc1: &str, doc2: &str) -> f64 {
    let a = token_set(doc1);
    let b = token_set(doc2);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_same_text_is_one() {
        let text = "This is a test sentence";
        assert_eq!(overlap_coefficient(text, text), 1.0);
    }

    #[test]
    fn test_overlap_different_text_below_one() {
        let score = overlap_coefficient(
            "This is a test sentence",
            "This is a completely different sentence",
        );
        assert!((0.0..1.0).contains(&score));
    }

    #[test]
    fn test_overlap_empty_is_zero() {
        assert_eq!(overlap_coefficient("", "This is a test sentence"), 0.0);
        assert_eq!(overlap_coefficient("This is a test sentence", ""), 0.0);
        assert_eq!(overlap_coefficient("!!! ---", "words"), 0.0);
    }

    #[test]
    fn test_overlap_ignores_case_and_punctuation() {
        assert_eq!(
            overlap_coefficient("THIS IS A TEST SENTENCE", "this is a test sentence"),
            1.0
        );
        let score = overlap_coefficient(
            "This is a test! sentence with @#$% special characters",
            "This is a test sentence with special characters",
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_overlap_skill_lists() {
        let score = overlap_coefficient("Python SQL Java", "Python Java Go");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = "Rust engineer with tokio and axum experience";
        let b = "We need an axum and Rust backend engineer";
        assert_eq!(overlap_coefficient(a, b), overlap_coefficient(b, a));
    }

    #[test]
    fn test_overlap_subset_scores_one() {
        assert_eq!(overlap_coefficient("rust go", "rust go python java"), 1.0);
    }

    #[test]
    fn test_overlap_counts_distinct_tokens() {
        // Repeats do not inflate either side.
        assert_eq!(overlap_coefficient("rust rust rust", "rust go"), 1.0);
    }

    #[test]
    fn test_overlap_on_json_documents() {
        let a = r#"{"key1": "value1", "key2": "value2"}"#;
        let b = r#"{"key1": "value1", "key3": "value3"}"#;
        assert_eq!(overlap_coefficient(a, b), 0.5);
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard_similarity("a b c", "b c d"), 0.5);
        assert_eq!(jaccard_similarity("", ""), 0.0);
        assert_eq!(jaccard_similarity("same words", "Same Words"), 1.0);
    }
}
