//! In-process vector storage
//!
//! Keeps every point in memory and answers searches by brute-force cosine
//! similarity. Suitable for tests and small knowledge bases.

use crate::{
    VectorDataError, VectorDataResult,
    chunk_id::generate_chunk_id,
    storage::{EmbeddedChunk, SearchHit, StorageStats, VectorStorage},
};
use async_trait::async_trait;
use rustbot_common::CorrelationId;
use rustbot_embeddings::{EmbeddingError, cosine_similarity};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredPoint {
    chunk_id: Uuid,
    source: String,
    position: usize,
    text: String,
    embedding: Vec<f32>,
}

#[derive(Debug, Default)]
struct Collection {
    exists: bool,
    points: Vec<StoredPoint>,
}

/// In-memory storage backend
#[derive(Clone)]
pub struct MemoryStorage {
    collection_name: String,
    state: Arc<RwLock<Collection>>,
    fail_on_store: bool,
    fail_on_search: bool,
}

impl MemoryStorage {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            state: Arc::new(RwLock::new(Collection::default())),
            fail_on_store: false,
            fail_on_search: false,
        }
    }

    /// Configure to fail on store operations
    #[must_use]
    pub const fn with_store_failure(mut self) -> Self {
        self.fail_on_store = true;
        self
    }

    /// Configure to fail on search operations
    #[must_use]
    pub const fn with_search_failure(mut self) -> Self {
        self.fail_on_search = true;
        self
    }

    /// Sources and positions of everything stored, in insertion order
    pub async fn stored_positions(&self) -> Vec<(String, usize)> {
        self.state
            .read()
            .await
            .points
            .iter()
            .map(|point| (point.source.clone(), point.position))
            .collect()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("rustbot-memory")
    }
}

#[async_trait]
impl VectorStorage for MemoryStorage {
    async fn store_chunks(
        &self,
        source: &str,
        chunks: &[EmbeddedChunk],
        correlation_id: &CorrelationId,
    ) -> VectorDataResult<Vec<Uuid>> {
        if self.fail_on_store {
            return Err(VectorDataError::Storage(
                "Memory storage configured to fail".into(),
            ));
        }

        let mut state = self.state.write().await;
        if !state.exists {
            return Err(VectorDataError::CollectionError(format!(
                "Collection '{}' does not exist",
                self.collection_name
            )));
        }

        let mut ids = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let chunk_id = generate_chunk_id(source, chunk.position);
            ids.push(chunk_id);

            // Upsert semantics: same ID replaces the previous point
            state.points.retain(|point| point.chunk_id != chunk_id);
            state.points.push(StoredPoint {
                chunk_id,
                source: source.to_string(),
                position: chunk.position,
                text: chunk.text.clone(),
                embedding: chunk.embedding.clone(),
            });
        }

        tracing::debug!(
            correlation_id = %correlation_id,
            source = %source,
            chunk_count = chunks.len(),
            "Stored chunks in memory"
        );

        Ok(ids)
    }

    async fn search(
        &self,
        query_embedding: Vec<f32>,
        limit: usize,
        correlation_id: &CorrelationId,
    ) -> VectorDataResult<Vec<SearchHit>> {
        if self.fail_on_search {
            return Err(VectorDataError::Storage(
                "Memory storage configured to fail".into(),
            ));
        }

        let state = self.state.read().await;
        tracing::debug!(
            correlation_id = %correlation_id,
            point_count = state.points.len(),
            "Memory search operation"
        );

        let mut hits = state
            .points
            .iter()
            .map(|point| {
                let score = cosine_similarity(&query_embedding, &point.embedding).map_err(
                    |e| match e {
                        EmbeddingError::DimensionMismatch { expected, actual } => {
                            VectorDataError::DimensionMismatch {
                                expected: actual,
                                actual: expected,
                            }
                        }
                        other => VectorDataError::Storage(other.to_string()),
                    },
                )?;
                Ok(SearchHit {
                    chunk_id: point.chunk_id,
                    source: point.source.clone(),
                    position: point.position,
                    text: point.text.clone(),
                    score,
                })
            })
            .collect::<VectorDataResult<Vec<_>>>()?;

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn collection_exists(&self) -> VectorDataResult<bool> {
        Ok(self.state.read().await.exists)
    }

    async fn ensure_collection(&self) -> VectorDataResult<()> {
        self.state.write().await.exists = true;
        Ok(())
    }

    async fn drop_collection(&self) -> VectorDataResult<bool> {
        let mut state = self.state.write().await;
        let existed = state.exists;
        state.exists = false;
        state.points.clear();
        Ok(existed)
    }

    async fn get_stats(&self) -> VectorDataResult<StorageStats> {
        Ok(StorageStats {
            vector_count: self.state.read().await.points.len(),
            collection_name: self.collection_name.clone(),
            storage_type: "memory".to_string(),
        })
    }
}
