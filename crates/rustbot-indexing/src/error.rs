//! Error types for knowledge-base ingestion

use rustbot_chunking::ChunkingError;
use rustbot_embeddings::EmbeddingError;
use rustbot_vector_data::VectorDataError;
use thiserror::Error;

/// Result type alias for indexing operations
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Errors raised while ingesting documents
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Filesystem errors while collecting or reading documents
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A document could not be chunked
    #[error("Chunking failed: {0}")]
    Chunking(#[from] ChunkingError),

    /// The embedding service failed
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The vector store failed
    #[error("Vector storage failed: {0}")]
    Storage(#[from] VectorDataError),

    /// Embedding count does not match chunk count
    #[error("Expected {expected} embeddings, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },
}

impl IndexerError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }
}
