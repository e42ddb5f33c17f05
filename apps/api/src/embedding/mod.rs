//! Embedding providers: the only external dependency of the similarity scorer.
//!
//! The scorer talks to `dyn EmbeddingProvider`; swapping providers never
//! changes its contract.

use async_trait::async_trait;
use thiserror::Error;

pub mod openai;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("No embedding provider is configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider returned no embedding")]
    Empty,

    #[error("Embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Embedding request timed out after {0}s")]
    Timeout(u64),
}

/// Returns a fixed-length vector for a text. Identical input and model must
/// produce identical output.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Model identifier, reported for transparency.
    fn model(&self) -> &str;
}

/// Stand-in used when no API key is configured. Every call reports the
/// provider as unavailable so semantic scores are never fabricated.
pub struct UnconfiguredEmbedder;

#[async_trait]
impl EmbeddingProvider for UnconfiguredEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::NotConfigured)
    }

    fn model(&self) -> &str {
        "none"
    }
}
