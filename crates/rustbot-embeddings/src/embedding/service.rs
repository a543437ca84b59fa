//! Default implementation of the `EmbeddingService`

use super::ollama::OllamaEmbeddingProvider;
use super::traits::{EmbeddingProvider, EmbeddingService, EmbeddingStats};
use crate::EmbeddingResult;
use async_trait::async_trait;
use rustbot_config::EmbeddingConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Batching embedding service over a shared provider
pub struct DefaultEmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    stats: Arc<RwLock<EmbeddingStats>>,
    batch_size: usize,
}

impl DefaultEmbeddingService {
    /// Create a service backed by the Ollama provider
    ///
    /// # Errors
    /// Returns an error if the provider cannot be created
    pub fn new(config: &EmbeddingConfig) -> EmbeddingResult<Self> {
        let provider = Arc::new(OllamaEmbeddingProvider::new(config)?);
        Ok(Self::with_provider(provider, config.batch_size))
    }

    /// Create with a custom provider
    pub fn with_provider(provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        let stats = Arc::new(RwLock::new(EmbeddingStats {
            model_name: provider.model_name().to_string(),
            embedding_dimension: provider.embedding_dimension(),
            ..Default::default()
        }));

        Self {
            provider,
            stats,
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl EmbeddingService for DefaultEmbeddingService {
    async fn generate_embeddings(&self, texts: Vec<&str>) -> EmbeddingResult<Vec<Vec<f32>>> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let start = Instant::now();

            let embeddings = self.provider.embed_batch(batch).await?;
            all_embeddings.extend(embeddings);

            record_batch(&mut *self.stats.write().await, batch.len(), start.elapsed());
        }

        tracing::debug!(count = all_embeddings.len(), "Generated embeddings");
        Ok(all_embeddings)
    }

    fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    async fn get_stats(&self) -> EmbeddingStats {
        self.stats.read().await.clone()
    }
}

#[allow(clippy::cast_precision_loss, clippy::arithmetic_side_effects)]
fn record_batch(stats: &mut EmbeddingStats, batch_len: usize, elapsed: Duration) {
    stats.total_embeddings += batch_len;
    stats.total_batches += 1;

    // Running average
    let elapsed = elapsed.as_millis() as f64;
    let count = stats.total_batches as f64;
    stats.avg_batch_time_ms = (stats.avg_batch_time_ms * (count - 1.0) + elapsed) / count;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::mock::MockEmbeddingProvider;

    #[tokio::test]
    async fn test_embedding_service_batching() {
        let provider = Arc::new(MockEmbeddingProvider::new(768));
        let service = DefaultEmbeddingService::with_provider(Arc::clone(&provider) as _, 2);

        let texts = vec!["text1", "text2", "text3", "text4", "text5"];

        let embeddings = service.generate_embeddings(texts).await.unwrap();
        assert_eq!(embeddings.len(), 5);
        assert_eq!(embeddings[0].len(), 768);

        let stats = service.get_stats().await;
        assert_eq!(stats.total_embeddings, 5);
        assert_eq!(stats.total_batches, 3); // 5 texts with batch size 2 = 3 batches
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_embedding_service_error_handling() {
        let provider = Arc::new(MockEmbeddingProvider::new(768).with_failure());
        let service = DefaultEmbeddingService::with_provider(provider, 2);

        let result = service.generate_embeddings(vec!["text1"]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_embed_text_returns_single_vector() {
        let provider = Arc::new(MockEmbeddingProvider::new(4));
        let service = DefaultEmbeddingService::with_provider(provider, 8);

        let vector = service.embed_text("what is a trait?").await.unwrap();
        assert_eq!(vector.len(), 4);
        assert_eq!(service.provider().model_name(), "mock-embedding-model");
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_clamped() {
        let provider = Arc::new(MockEmbeddingProvider::new(4));
        let service = DefaultEmbeddingService::with_provider(provider, 0);

        let embeddings = service.generate_embeddings(vec!["a", "b"]).await.unwrap();
        assert_eq!(embeddings.len(), 2);
    }
}
