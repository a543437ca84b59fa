//! Storage abstraction traits for vector databases

use crate::VectorDataResult;
use async_trait::async_trait;
use rustbot_common::CorrelationId;
use uuid::Uuid;

/// A chunk paired with its embedding, ready to store
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    /// 1-based position of the chunk within its document
    pub position: usize,
    /// Chunk text as produced by the chunker
    pub text: String,
    /// Embedding of `text`
    pub embedding: Vec<f32>,
}

/// A stored chunk returned by a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub chunk_id: Uuid,
    /// Document the chunk came from
    pub source: String,
    pub position: usize,
    pub text: String,
    /// Cosine similarity to the query, higher is closer
    pub score: f32,
}

/// Trait for vector storage backends
#[async_trait]
pub trait VectorStorage: Send + Sync {
    /// Store the embedded chunks of one document
    ///
    /// Returns the chunk IDs that were stored
    async fn store_chunks(
        &self,
        source: &str,
        chunks: &[EmbeddedChunk],
        correlation_id: &CorrelationId,
    ) -> VectorDataResult<Vec<Uuid>>;

    /// Return up to `limit` chunks ordered by descending similarity
    async fn search(
        &self,
        query_embedding: Vec<f32>,
        limit: usize,
        correlation_id: &CorrelationId,
    ) -> VectorDataResult<Vec<SearchHit>>;

    /// Check if the storage collection exists
    async fn collection_exists(&self) -> VectorDataResult<bool>;

    /// Create the storage collection if it doesn't exist
    async fn ensure_collection(&self) -> VectorDataResult<()>;

    /// Drop the entire collection
    ///
    /// Returns `false` when there was nothing to drop
    async fn drop_collection(&self) -> VectorDataResult<bool>;

    /// Get storage statistics
    async fn get_stats(&self) -> VectorDataResult<StorageStats>;
}

/// Statistics about the vector storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of vectors stored
    pub vector_count: usize,
    /// Collection name
    pub collection_name: String,
    /// Storage backend type (e.g., "qdrant", "memory")
    pub storage_type: String,
}
