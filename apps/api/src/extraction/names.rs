//! Person-name detection backends used when the first line of a resume does
//! not look like a name.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Finds person names in free text. Implementations must not fail: an
/// unreachable backend reports no names.
#[async_trait]
pub trait PersonNameDetector: Send + Sync {
    async fn find_person_names(&self, text: &str) -> Vec<String>;
}

/// Detector used when no NER service is configured.
pub struct NoNameDetector;

#[async_trait]
impl PersonNameDetector for NoNameDetector {
    async fn find_person_names(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

/// One `(span, label)` pair returned by the NER service.
#[derive(Debug, Deserialize)]
pub struct NerEntity {
    pub text: String,
    pub label: String,
}

/// Calls an external NER service that answers `POST {"text": ...}` with a
/// JSON array of `{"text", "label"}` entities.
#[derive(Clone)]
pub struct HttpNameDetector {
    client: Client,
    endpoint: String,
}

impl HttpNameDetector {
    pub fn new(endpoint: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    async fn request(&self, text: &str) -> Result<Vec<NerEntity>, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .json(&NerRequest { text })
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<NerEntity>>()
            .await
    }
}

#[async_trait]
impl PersonNameDetector for HttpNameDetector {
    async fn find_person_names(&self, text: &str) -> Vec<String> {
        match self.request(text).await {
            Ok(entities) => {
                let names = person_names(entities);
                debug!("NER service returned {} person names", names.len());
                names
            }
            Err(e) => {
                warn!("NER service unavailable, skipping name fallback: {e}");
                Vec::new()
            }
        }
    }
}

/// Keeps the spans labelled as a person, in service order.
fn person_names(entities: Vec<NerEntity>) -> Vec<String> {
    entities
        .into_iter()
        .filter(|e| e.label.eq_ignore_ascii_case("person") || e.label.eq_ignore_ascii_case("per"))
        .map(|e| e.text.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_names_filters_labels() {
        let entities: Vec<NerEntity> = serde_json::from_str(
            r#"[
                {"text": "Acme Corp", "label": "ORG"},
                {"text": " Jane Doe ", "label": "PERSON"},
                {"text": "Berlin", "label": "GPE"},
                {"text": "John Roe", "label": "PER"}
            ]"#,
        )
        .unwrap();

        assert_eq!(person_names(entities), vec!["Jane Doe", "John Roe"]);
    }

    #[tokio::test]
    async fn test_no_name_detector_is_empty() {
        assert!(NoNameDetector
            .find_person_names("Jane Doe")
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_no_names() {
        let detector =
            HttpNameDetector::new("http://127.0.0.1:9/ner".to_string(), Duration::from_secs(1))
                .unwrap();
        assert!(detector.find_person_names("Jane Doe").await.is_empty());
    }
}
