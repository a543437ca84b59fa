//! Trait abstractions for embedding generation
//!
//! Providers talk to a model; the service sits in front of a provider and
//! handles batching and bookkeeping.

use crate::EmbeddingResult;
use async_trait::async_trait;
use rustbot_common::CommonError;

/// Trait for embedding generation providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts
    ///
    /// Returns one vector per input text, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Length of the vectors produced by this provider
    fn embedding_dimension(&self) -> usize;

    /// Name of the embedding model
    fn model_name(&self) -> &str;
}

/// Service for managing embedding generation
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generate embeddings for `texts`, split into provider-sized batches
    async fn generate_embeddings(&self, texts: Vec<&str>) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embed a single text such as a user question
    async fn embed_text(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.generate_embeddings(vec![text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| crate::EmbeddingError::parse_error("no embedding returned"))
    }

    /// Get the embedding provider being used
    fn provider(&self) -> &dyn EmbeddingProvider;

    /// Get service statistics
    async fn get_stats(&self) -> EmbeddingStats;
}

/// Statistics about embedding generation
#[derive(Debug, Clone, Default)]
pub struct EmbeddingStats {
    /// Total number of embeddings generated
    pub total_embeddings: usize,

    /// Total number of batches processed
    pub total_batches: usize,

    /// Average batch processing time in milliseconds
    pub avg_batch_time_ms: f64,

    /// Model name being used
    pub model_name: String,

    /// Model dimension
    pub embedding_dimension: usize,
}
