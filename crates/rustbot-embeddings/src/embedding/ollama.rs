//! Ollama embedding provider
//!
//! Uses the batch endpoint `POST {base_url}/api/embed`, which accepts a list
//! of inputs and answers with one vector per input.

use super::traits::EmbeddingProvider;
use crate::{EmbeddingError, EmbeddingResult};
use async_trait::async_trait;
use reqwest::Client;
use rustbot_common::CommonError;
use rustbot_config::EmbeddingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedding provider backed by an Ollama server
pub struct OllamaEmbeddingProvider {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbeddingProvider {
    /// Create a provider from the embedding configuration
    ///
    /// # Errors
    /// Returns `EmbeddingError::Config` if the HTTP client cannot be built
    pub fn new(config: &EmbeddingConfig) -> EmbeddingResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| EmbeddingError::config_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/embed", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(model = %self.model, batch = texts.len(), "Requesting embeddings");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api { status, body });
        }

        let parsed: EmbedResponse = response.json().await?;

        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.embeddings.len()
            )));
        }

        if let Some(bad) = parsed
            .embeddings
            .iter()
            .find(|vector| vector.len() != self.dimensions)
        {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.len(),
            });
        }

        Ok(parsed.embeddings)
    }

    fn embedding_dimension(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, dimensions: usize) -> OllamaEmbeddingProvider {
        let config = EmbeddingConfig {
            base_url: server.uri(),
            dimensions,
            ..EmbeddingConfig::default()
        };
        OllamaEmbeddingProvider::new(&config).expect("Should build provider")
    }

    #[tokio::test]
    async fn test_embed_batch_sends_model_and_inputs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_json(json!({
                "model": "embeddinggemma",
                "input": ["first", "second"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "embeddinggemma",
                "embeddings": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, 3);
        let vectors = provider
            .embed_batch(&["first", "second"])
            .await
            .expect("Should embed");

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], vec![0.4, 0.5, 0.6]);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let provider = provider_for(&server, 3);
        let vectors = provider.embed_batch(&[]).await.expect("Should succeed");
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let provider = provider_for(&server, 3);
        let err = provider.embed_batch(&["text"]).await.unwrap_err();

        match err {
            EmbeddingError::Api { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("model not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [[0.1, 0.2]] })),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server, 3);
        let err = provider.embed_batch(&["text"]).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_embeddings_field_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
            .mount(&server)
            .await;

        let provider = provider_for(&server, 3);
        let err = provider.embed_batch(&["text"]).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }
}
