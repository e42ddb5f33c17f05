//! Client for OpenAI-compatible `/embeddings` endpoints.
//!
//! Retries 429 and 5xx responses with exponential backoff. Callers still put
//! their own timeout around `embed`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embedding::{EmbeddingError, EmbeddingProvider};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: String,
        base_url: &str,
        model: String,
        timeout: Duration,
        max_retries: u32,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing embedding API key");
        anyhow::ensure!(!model.trim().is_empty(), "missing embedding model name");
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: embeddings_endpoint(base_url),
            api_key,
            model,
            max_retries,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: [text],
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..self.attempts() {
            if attempt > 0 {
                let delay = retry_backoff(attempt);
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: EmbeddingResponse = response.json().await?;
            let embedding = parsed
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .filter(|v| !v.is_empty())
                .ok_or(EmbeddingError::Empty)?;

            debug!(
                model = %self.model,
                dimensions = embedding.len(),
                "Embedding call succeeded"
            );

            return Ok(embedding);
        }

        Err(last_error.unwrap_or(EmbeddingError::Empty))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl OpenAiEmbedder {
    /// The first call plus `max_retries` retries.
    fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

fn embeddings_endpoint(base_url: &str) -> String {
    format!("{}/embeddings", base_url.trim_end_matches('/'))
}

/// 500ms, 1s, 2s, ... capped at 16s.
fn retry_backoff(attempt: u32) -> Duration {
    let capped = attempt.saturating_sub(1).min(5);
    Duration::from_millis(500 * (1 << capped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            embeddings_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/embeddings"
        );
        assert_eq!(
            embeddings_endpoint("http://localhost:8000/v1"),
            "http://localhost:8000/v1/embeddings"
        );
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(retry_backoff(1), Duration::from_millis(500));
        assert_eq!(retry_backoff(2), Duration::from_millis(1000));
        assert_eq!(retry_backoff(3), Duration::from_millis(2000));
        assert_eq!(retry_backoff(40), Duration::from_millis(16000));
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(EmbeddingRequest {
            model: "text-embedding-3-small",
            input: ["hello"],
        })
        .unwrap();
        assert_eq!(body["model"], "text-embedding-3-small");
        assert_eq!(body["input"][0], "hello");
    }

    #[test]
    fn test_response_parses() {
        let parsed: EmbeddingResponse = serde_json::from_str(
            r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,0.2]}],"model":"m"}"#,
        )
        .unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
    }

    #[test]
    fn test_new_rejects_blank_key() {
        assert!(OpenAiEmbedder::new(
            "  ".to_string(),
            "https://api.openai.com/v1",
            "m".to_string(),
            Duration::from_secs(5),
            3
        )
        .is_err());
    }

    #[test]
    fn test_retries_are_on_top_of_first_attempt() {
        let embedder = |retries| {
            OpenAiEmbedder::new(
                "key".to_string(),
                "https://api.openai.com/v1",
                "m".to_string(),
                Duration::from_secs(5),
                retries,
            )
            .unwrap()
        };
        assert_eq!(embedder(0).attempts(), 1);
        assert_eq!(embedder(3).attempts(), 4);
        assert_eq!(embedder(u32::MAX).attempts(), u32::MAX);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let embedder = OpenAiEmbedder::new(
            "key".to_string(),
            "http://127.0.0.1:9/v1",
            "m".to_string(),
            Duration::from_secs(1),
            0,
        )
        .unwrap();
        assert!(matches!(
            embedder.embed("hello").await,
            Err(EmbeddingError::Http(_))
        ));
    }
}
