//! Axum route handlers for the Similarity API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::ResumeRecord;
use crate::scoring::lexical::jaccard_similarity;
use crate::scoring::metrics::{alignment_report, AlignmentReport};
use crate::scoring::{lexical_similarity, DocumentPair, SimilarityResult};
use crate::state::AppState;

/// Upper bound on pairs per batch request.
const MAX_BATCH_PAIRS: usize = 64;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LexicalResponse {
    pub lexical_score: f64,
    pub jaccard_score: f64,
}

#[derive(Debug, Serialize)]
pub struct CombinedResponse {
    pub combined_score: f64,
    pub blend: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub pairs: Vec<DocumentPair>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Scored(SimilarityResult),
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_description: String,
    /// Score the serialized record instead of the raw resume text.
    #[serde(default)]
    pub compare_record: bool,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub record: ResumeRecord,
    pub similarity: SimilarityResult,
}

#[derive(Debug, Deserialize)]
pub struct MetricsRequest {
    pub original_resume: String,
    pub tailored_resume: String,
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/similarity
///
/// Lexical, semantic and combined scores for one pair. Empty documents score
/// 0.0; a failing embedding provider returns 503.
pub async fn handle_similarity(
    State(state): State<AppState>,
    Json(pair): Json<DocumentPair>,
) -> Result<Json<SimilarityResult>, AppError> {
    let result = state.scorer.score(&pair.doc1, &pair.doc2).await?;
    Ok(Json(result))
}

/// POST /api/v1/similarity/combined
///
/// Only the blended score, labelled with the active blend strategy.
pub async fn handle_combined(
    State(state): State<AppState>,
    Json(pair): Json<DocumentPair>,
) -> Result<Json<CombinedResponse>, AppError> {
    let combined_score = state.scorer.combined(&pair.doc1, &pair.doc2).await?;
    Ok(Json(CombinedResponse {
        combined_score,
        blend: state.scorer.blend_label(),
    }))
}

/// POST /api/v1/similarity/lexical
///
/// Token-overlap measures only; never touches the embedding provider.
pub async fn handle_lexical(Json(pair): Json<DocumentPair>) -> Json<LexicalResponse> {
    Json(LexicalResponse {
        lexical_score: lexical_similarity(&pair.doc1, &pair.doc2),
        jaccard_score: jaccard_similarity(&pair.doc1, &pair.doc2),
    })
}

/// POST /api/v1/similarity/batch
///
/// Scores each pair on its own task. A failing pair reports its error in
/// place; the rest of the batch still succeeds.
pub async fn handle_similarity_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    if request.pairs.is_empty() {
        return Err(AppError::Validation("pairs cannot be empty".to_string()));
    }
    if request.pairs.len() > MAX_BATCH_PAIRS {
        return Err(AppError::Validation(format!(
            "at most {MAX_BATCH_PAIRS} pairs per request"
        )));
    }

    let count = request.pairs.len();
    let results = state
        .scorer
        .clone()
        .score_batch(request.pairs)
        .await
        .into_iter()
        .map(|r| match r {
            Ok(scored) => BatchItem::Scored(scored),
            Err(e) => BatchItem::Failed {
                error: e.to_string(),
            },
        })
        .collect();

    info!("Scored batch of {count} document pairs");
    Ok(Json(BatchResponse { results }))
}

/// POST /api/v1/match
///
/// Extracts a record from the resume and scores it against the job
/// description.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let record = state.extractor.extract(&request.resume_text).await;
    let candidate = if request.compare_record {
        record.to_document()
    } else {
        request.resume_text.clone()
    };

    let similarity = state
        .scorer
        .score(&candidate, &request.job_description)
        .await?;

    Ok(Json(MatchResponse { record, similarity }))
}

/// POST /api/v1/metrics
///
/// Personalization, job alignment and job match scores for a tailored resume.
pub async fn handle_metrics(
    State(state): State<AppState>,
    Json(request): Json<MetricsRequest>,
) -> Result<Json<AlignmentReport>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let report = alignment_report(
        &state.scorer,
        &request.original_resume,
        &request.tailored_resume,
        &request.job_description,
    )
    .await?;

    Ok(Json(report))
}
