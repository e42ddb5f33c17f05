//! Similarity Scorer: quantifies closeness between two text documents.
//!
//! Two independent measures:
//! - lexical: overlap coefficient on distinct case-folded tokens (pure, local)
//! - semantic: cosine similarity of provider embeddings (external call)
//!
//! and a blended score. `AppState` holds an `Arc<SimilarityScorer>` built at
//! startup with the configured provider and blend strategy.

pub mod handlers;
pub mod lexical;
pub mod metrics;
pub mod semantic;
pub mod weighting;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::scoring::weighting::{round4, BlendStrategy};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),

    #[error("Scoring task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub lexical_score: f64,
    pub semantic_score: f64,
    pub combined_score: f64,
}

impl SimilarityResult {
    const ZERO: SimilarityResult = SimilarityResult {
        lexical_score: 0.0,
        semantic_score: 0.0,
        combined_score: 0.0,
    };
}

/// A pair of documents to compare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPair {
    pub doc1: String,
    pub doc2: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Core measures
// ────────────────────────────────────────────────────────────────────────────

/// Overlap coefficient on distinct tokens. 0.0 when either side is empty.
pub fn lexical_similarity(doc1: &str, doc2: &str) -> f64 {
    lexical::overlap_coefficient(doc1, doc2)
}

/// Cosine similarity of the two documents' embeddings, in [0, 1].
///
/// Empty documents score 0.0 without calling the provider. Provider failures
/// surface as `ScoringError::EmbeddingUnavailable`.
pub async fn semantic_similarity(
    doc1: &str,
    doc2: &str,
    provider: &dyn EmbeddingProvider,
) -> Result<f64, ScoringError> {
    if doc1.trim().is_empty() || doc2.trim().is_empty() {
        return Ok(0.0);
    }

    let (a, b) = tokio::try_join!(provider.embed(doc1), provider.embed(doc2))?;
    Ok(semantic::cosine_similarity(&a, &b)?)
}

/// All three scores for a pair. The combined score is the blend of the other
/// two, clamped into [0, 1] and rounded to 4 decimals.
pub async fn score_pair(
    doc1: &str,
    doc2: &str,
    provider: &dyn EmbeddingProvider,
    blend: &dyn BlendStrategy,
) -> Result<SimilarityResult, ScoringError> {
    if doc1.trim().is_empty() || doc2.trim().is_empty() {
        return Ok(SimilarityResult::ZERO);
    }

    let lexical_score = lexical_similarity(doc1, doc2);
    let semantic_score = semantic_similarity(doc1, doc2, provider).await?;
    let combined_score = round4(blend.blend(lexical_score, semantic_score).clamp(0.0, 1.0));

    Ok(SimilarityResult {
        lexical_score,
        semantic_score,
        combined_score,
    })
}

/// The combined score alone (see `score_pair`).
pub async fn combined_similarity(
    doc1: &str,
    doc2: &str,
    provider: &dyn EmbeddingProvider,
    blend: &dyn BlendStrategy,
) -> Result<f64, ScoringError> {
    Ok(score_pair(doc1, doc2, provider, blend)
        .await?
        .combined_score)
}

// ────────────────────────────────────────────────────────────────────────────
// Service-facing scorer
// ────────────────────────────────────────────────────────────────────────────

/// Holds the embedding provider, blend strategy and the timeout applied
/// around every embedding round-trip.
pub struct SimilarityScorer {
    provider: Arc<dyn EmbeddingProvider>,
    blend: Arc<dyn BlendStrategy>,
    timeout: Duration,
}

impl SimilarityScorer {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        blend: Arc<dyn BlendStrategy>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            blend,
            timeout,
        }
    }

    pub fn embedding_model(&self) -> &str {
        self.provider.model()
    }

    pub fn blend_label(&self) -> String {
        self.blend.label()
    }

    pub async fn score(&self, doc1: &str, doc2: &str) -> Result<SimilarityResult, ScoringError> {
        let result = self
            .within_timeout(score_pair(
                doc1,
                doc2,
                self.provider.as_ref(),
                self.blend.as_ref(),
            ))
            .await?;

        debug!(
            lexical = result.lexical_score,
            semantic = result.semantic_score,
            combined = result.combined_score,
            "Scored document pair"
        );
        Ok(result)
    }

    /// Only the blended score, under the same timeout as `score`.
    pub async fn combined(&self, doc1: &str, doc2: &str) -> Result<f64, ScoringError> {
        self.within_timeout(combined_similarity(
            doc1,
            doc2,
            self.provider.as_ref(),
            self.blend.as_ref(),
        ))
        .await
    }

    async fn within_timeout<T>(
        &self,
        scoring: impl Future<Output = Result<T, ScoringError>>,
    ) -> Result<T, ScoringError> {
        match tokio::time::timeout(self.timeout, scoring).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Embedding provider did not answer within {}s",
                    self.timeout.as_secs()
                );
                Err(EmbeddingError::Timeout(self.timeout.as_secs()).into())
            }
        }
    }

    /// Scores every pair on its own task. Results keep input order; one
    /// failing pair does not affect the others.
    pub async fn score_batch(
        self: Arc<Self>,
        pairs: Vec<DocumentPair>,
    ) -> Vec<Result<SimilarityResult, ScoringError>> {
        let handles: Vec<_> = pairs
            .into_iter()
            .map(|pair| {
                let scorer = Arc::clone(&self);
                tokio::spawn(async move { scorer.score(&pair.doc1, &pair.doc2).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(e) => Err(ScoringError::Task(e.to_string())),
            });
        }
        results
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{FailingEmbedder, LetterEmbedder, SlowEmbedder};
    use super::*;
    use crate::scoring::weighting::{EqualWeight, Weighted};

    fn scorer(provider: Arc<dyn EmbeddingProvider>) -> Arc<SimilarityScorer> {
        Arc::new(SimilarityScorer::new(
            provider,
            Arc::new(EqualWeight),
            Duration::from_secs(5),
        ))
    }

    #[test]
    fn test_lexical_reflexive_and_symmetric() {
        let a = "Senior Rust engineer, distributed systems";
        let b = "Rust developer for systems work";
        assert_eq!(lexical_similarity(a, a), 1.0);
        assert_eq!(lexical_similarity(a, b), lexical_similarity(b, a));
        assert_eq!(lexical_similarity("", a), 0.0);
    }

    #[tokio::test]
    async fn test_semantic_identical_docs() {
        let score = semantic_similarity("hello world", "hello world", &LetterEmbedder)
            .await
            .unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_semantic_empty_skips_provider() {
        let score = semantic_similarity("", "anything", &FailingEmbedder)
            .await
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn test_semantic_propagates_provider_failure() {
        let err = semantic_similarity("a", "b", &FailingEmbedder)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::EmbeddingUnavailable(_)));
    }

    #[tokio::test]
    async fn test_combined_is_rounded_mean() {
        let a = "Python SQL Java";
        let b = "Python Java Go";
        let result = score_pair(a, b, &LetterEmbedder, &EqualWeight).await.unwrap();

        let expected = round4((result.lexical_score + result.semantic_score) / 2.0);
        assert_eq!(result.combined_score, expected);
        assert!((0.0..=1.0).contains(&result.combined_score));
        assert!((result.lexical_score - 2.0 / 3.0).abs() < 1e-9);

        let combined = combined_similarity(a, b, &LetterEmbedder, &EqualWeight)
            .await
            .unwrap();
        assert_eq!(combined, expected);
    }

    #[tokio::test]
    async fn test_weighted_blend_is_pluggable() {
        let result = score_pair("rust tokio", "rust axum", &LetterEmbedder, &Weighted::new(1.0))
            .await
            .unwrap();
        assert_eq!(result.combined_score, round4(result.lexical_score));
    }

    #[tokio::test]
    async fn test_empty_pair_scores_zero() {
        let result = score_pair("   ", "doc", &FailingEmbedder, &EqualWeight)
            .await
            .unwrap();
        assert_eq!(result, SimilarityResult::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_surfaces_as_embedding_unavailable() {
        let scorer = SimilarityScorer::new(
            Arc::new(SlowEmbedder),
            Arc::new(EqualWeight),
            Duration::from_secs(1),
        );
        let err = scorer.score("a", "b").await.unwrap_err();
        assert!(matches!(
            err,
            ScoringError::EmbeddingUnavailable(EmbeddingError::Timeout(1))
        ));
    }

    #[tokio::test]
    async fn test_scorer_combined_matches_score() {
        let scorer = scorer(Arc::new(LetterEmbedder));
        let full = scorer.score("rust tokio axum", "rust axum").await.unwrap();
        let combined = scorer.combined("rust tokio axum", "rust axum").await.unwrap();
        assert_eq!(combined, full.combined_score);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scorer_combined_times_out() {
        let scorer = SimilarityScorer::new(
            Arc::new(SlowEmbedder),
            Arc::new(EqualWeight),
            Duration::from_secs(2),
        );
        let err = scorer.combined("a", "b").await.unwrap_err();
        assert!(matches!(
            err,
            ScoringError::EmbeddingUnavailable(EmbeddingError::Timeout(2))
        ));
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let pairs = vec![
            DocumentPair {
                doc1: "rust".into(),
                doc2: "rust".into(),
            },
            DocumentPair {
                doc1: "".into(),
                doc2: "rust".into(),
            },
            DocumentPair {
                doc1: "Python SQL Java".into(),
                doc2: "Python Java Go".into(),
            },
        ];

        let results = scorer(Arc::new(LetterEmbedder)).score_batch(pairs).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().combined_score, 1.0);
        assert_eq!(results[1].as_ref().unwrap().combined_score, 0.0);
        assert!((results[2].as_ref().unwrap().lexical_score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let pairs = vec![
            DocumentPair {
                doc1: "".into(),
                doc2: "x".into(),
            },
            DocumentPair {
                doc1: "a".into(),
                doc2: "b".into(),
            },
        ];
        let results = scorer(Arc::new(FailingEmbedder)).score_batch(pairs).await;
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
