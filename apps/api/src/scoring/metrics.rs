//! Alignment metrics for a tailored resume.
//!
//! - user personalization: tailored resume vs. the candidate's original resume
//! - job alignment: tailored resume vs. the job description
//! - job match: original resume vs. the job description

use serde::{Deserialize, Serialize};

use crate::scoring::{ScoringError, SimilarityResult, SimilarityScorer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub user_personalization: SimilarityResult,
    pub job_alignment: SimilarityResult,
    pub job_match: SimilarityResult,
    pub scorer_backend: String,
}

pub async fn alignment_report(
    scorer: &SimilarityScorer,
    original_resume: &str,
    tailored_resume: &str,
    job_description: &str,
) -> Result<AlignmentReport, ScoringError> {
    let (user_personalization, job_alignment, job_match) = tokio::try_join!(
        scorer.score(tailored_resume, original_resume),
        scorer.score(tailored_resume, job_description),
        scorer.score(original_resume, job_description),
    )?;

    Ok(AlignmentReport {
        user_personalization,
        job_alignment,
        job_match,
        scorer_backend: format!("{}+{}", scorer.embedding_model(), scorer.blend_label()),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::scoring::test_support::{FailingEmbedder, LetterEmbedder};
    use crate::scoring::weighting::EqualWeight;

    fn scorer(provider: Arc<dyn crate::embedding::EmbeddingProvider>) -> SimilarityScorer {
        SimilarityScorer::new(provider, Arc::new(EqualWeight), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_report_pairs_documents_correctly() {
        let original = "Python developer building Flask services";
        let tailored = "Python developer building Flask and Kubernetes services";
        let jd = "Kubernetes platform engineer";

        let report = alignment_report(&scorer(Arc::new(LetterEmbedder)), original, tailored, jd)
            .await
            .unwrap();

        // Every original token survives tailoring.
        assert_eq!(report.user_personalization.lexical_score, 1.0);
        // "kubernetes" is the only token shared with the JD (3 tokens).
        assert!((report.job_alignment.lexical_score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.job_match.lexical_score, 0.0);
        assert_eq!(report.scorer_backend, "letters+equal");
    }

    #[tokio::test]
    async fn test_report_fails_when_embeddings_fail() {
        let result = alignment_report(&scorer(Arc::new(FailingEmbedder)), "a", "b", "c").await;
        assert!(matches!(result, Err(ScoringError::EmbeddingUnavailable(_))));
    }
}
