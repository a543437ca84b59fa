use rustbot_common::CorrelationId;
use thiserror::Error;

/// Search-specific error types with correlation ID support
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Embedding generation returned nothing for the query (correlation: {correlation_id})")]
    EmbeddingFailed { correlation_id: CorrelationId },

    #[error("Search timeout after {timeout_ms}ms (correlation: {correlation_id})")]
    SearchTimeout {
        timeout_ms: u64,
        correlation_id: CorrelationId,
    },

    #[error("No matching knowledge found")]
    NoMatchingKnowledge { minimum_similarity: f32 },

    #[error("Embedding error: {0}")]
    EmbeddingError(#[from] rustbot_embeddings::EmbeddingError),

    #[error("Vector storage error: {0}")]
    VectorDataError(#[from] rustbot_vector_data::VectorDataError),
}
