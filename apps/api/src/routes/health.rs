use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the active embedding model and vocabulary size.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "matcher",
        "embedding_model": state.scorer.embedding_model(),
        "blend": state.scorer.blend_label(),
        "vocabulary_terms": state.extractor.vocabulary().term_count(),
        "month_precision": state.config.experience_month_precision,
    }))
}
