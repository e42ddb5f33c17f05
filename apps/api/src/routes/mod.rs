pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction API
        .route("/api/v1/extract", post(extraction::handle_extract))
        .route(
            "/api/v1/extract/upload",
            post(extraction::handle_extract_upload),
        )
        // Similarity API
        .route("/api/v1/similarity", post(scoring::handle_similarity))
        .route("/api/v1/similarity/lexical", post(scoring::handle_lexical))
        .route(
            "/api/v1/similarity/combined",
            post(scoring::handle_combined),
        )
        .route(
            "/api/v1/similarity/batch",
            post(scoring::handle_similarity_batch),
        )
        .route("/api/v1/match", post(scoring::handle_match))
        .route("/api/v1/metrics", post(scoring::handle_metrics))
        .with_state(state)
}
