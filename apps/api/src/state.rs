use std::sync::Arc;

use crate::config::Config;
use crate::extraction::FieldExtractor;
use crate::scoring::SimilarityScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Field extractor built with the configured vocabulary and name detector.
    pub extractor: Arc<FieldExtractor>,
    /// Scorer carrying the embedding provider, blend strategy and timeout.
    pub scorer: Arc<SimilarityScorer>,
}
