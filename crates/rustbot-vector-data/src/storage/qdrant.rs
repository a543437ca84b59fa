//! Qdrant vector database storage backend
//!
//! Each chunk becomes one point in a cosine-distance collection. The point ID
//! is derived from the chunk's document and position (see
//! [`generate_chunk_id`]), and the payload carries everything needed to
//! rebuild a [`SearchHit`] without a second lookup.
//!
//! # Example
//!
//! ```rust,no_run
//! use rustbot_common::CorrelationId;
//! use rustbot_vector_data::{QdrantStorage, VectorStorage, VectorStorageConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = QdrantStorage::new(&VectorStorageConfig::default())?;
//! storage.ensure_collection().await?;
//! let hits = storage.search(vec![0.1; 768], 6, &CorrelationId::new()).await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    VectorDataError, VectorDataResult,
    chunk_id::{generate_chunk_id, hash_content},
    storage::{EmbeddedChunk, SearchHit, StorageStats, VectorStorage},
};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    CollectionExistsRequest, CreateCollection, DeleteCollection, Distance,
    GetCollectionInfoRequest, PointStruct, SearchPoints, UpsertPoints, Value, VectorParams,
};
use qdrant_client::{Payload, Qdrant};
use rustbot_common::CorrelationId;
use rustbot_config::VectorStorageConfig;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Vector storage client for a single Qdrant collection
#[derive(Clone)]
pub struct QdrantStorage {
    client: Qdrant,
    collection_name: String,
    vector_dimension: usize,
}

impl QdrantStorage {
    /// Create a client for the configured collection
    ///
    /// Does not contact the server; call
    /// [`ensure_collection`](VectorStorage::ensure_collection) before storing.
    ///
    /// # Errors
    /// Returns `VectorDataError::Configuration` if the client cannot be built
    pub fn new(config: &VectorStorageConfig) -> VectorDataResult<Self> {
        let mut builder =
            Qdrant::from_url(&config.url).timeout(Duration::from_secs(config.timeout_seconds));

        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder.build().map_err(|e| {
            VectorDataError::Configuration(format!("Failed to create Qdrant client: {e}"))
        })?;

        Ok(Self {
            client,
            collection_name: config.collection_name.clone(),
            vector_dimension: config.vector_dimension,
        })
    }

    fn check_dimension(&self, vector: &[f32]) -> VectorDataResult<()> {
        if vector.len() == self.vector_dimension {
            Ok(())
        } else {
            Err(VectorDataError::DimensionMismatch {
                expected: self.vector_dimension,
                actual: vector.len(),
            })
        }
    }
}

fn chunk_payload(source: &str, chunk_id: Uuid, chunk: &EmbeddedChunk) -> HashMap<String, Value> {
    let mut payload = HashMap::new();
    payload.insert("chunk_id".to_string(), Value::from(chunk_id.to_string()));
    payload.insert("source".to_string(), Value::from(source.to_string()));
    payload.insert(
        "position".to_string(),
        Value::from(i64::try_from(chunk.position).unwrap_or(i64::MAX)),
    );
    payload.insert("text".to_string(), Value::from(chunk.text.clone()));
    payload.insert(
        "content_hash".to_string(),
        Value::from(hash_content(&chunk.text)),
    );
    payload
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> String {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[async_trait]
impl VectorStorage for QdrantStorage {
    #[tracing::instrument(skip(self), fields(collection = %self.collection_name))]
    async fn collection_exists(&self) -> VectorDataResult<bool> {
        let request = CollectionExistsRequest {
            collection_name: self.collection_name.clone(),
        };

        self.client.collection_exists(request).await.map_err(|e| {
            VectorDataError::StorageUnavailable(format!("Failed to check collection exists: {e}"))
        })
    }

    async fn ensure_collection(&self) -> VectorDataResult<()> {
        if self.collection_exists().await? {
            return Ok(());
        }

        let request = CreateCollection {
            collection_name: self.collection_name.clone(),
            vectors_config: Some(
                VectorParams {
                    size: self.vector_dimension as u64,
                    distance: Distance::Cosine as i32,
                    ..Default::default()
                }
                .into(),
            ),
            ..Default::default()
        };

        match self.client.create_collection(request).await {
            Ok(_) => {
                tracing::info!(collection = %self.collection_name, "Created collection");
                Ok(())
            }
            // Created concurrently by another process
            Err(e) if e.to_string().contains("already exists") => Ok(()),
            Err(e) => Err(VectorDataError::CollectionError(format!(
                "Failed to create collection '{}': {e}",
                self.collection_name
            ))),
        }
    }

    async fn drop_collection(&self) -> VectorDataResult<bool> {
        if !self.collection_exists().await? {
            return Ok(false);
        }

        let request = DeleteCollection {
            collection_name: self.collection_name.clone(),
            ..Default::default()
        };

        self.client.delete_collection(request).await.map_err(|e| {
            VectorDataError::CollectionError(format!(
                "Failed to drop collection '{}': {e}",
                self.collection_name
            ))
        })?;

        tracing::info!(collection = %self.collection_name, "Dropped collection");
        Ok(true)
    }

    #[tracing::instrument(skip(self, chunks), fields(source, chunk_count = chunks.len()))]
    async fn store_chunks(
        &self,
        source: &str,
        chunks: &[EmbeddedChunk],
        correlation_id: &CorrelationId,
    ) -> VectorDataResult<Vec<Uuid>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let mut points = Vec::with_capacity(chunks.len());
        let mut chunk_ids = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            self.check_dimension(&chunk.embedding)?;

            let chunk_id = generate_chunk_id(source, chunk.position);
            chunk_ids.push(chunk_id);
            points.push(PointStruct::new(
                chunk_id.to_string(),
                chunk.embedding.clone(),
                Payload::from(chunk_payload(source, chunk_id, chunk)),
            ));
        }

        tracing::info!(
            correlation_id = %correlation_id,
            source = %source,
            chunk_count = chunks.len(),
            "Storing chunks"
        );

        let upsert_request = UpsertPoints {
            collection_name: self.collection_name.clone(),
            points,
            wait: Some(true),
            ..Default::default()
        };

        self.client
            .upsert_points(upsert_request)
            .await
            .map_err(|e| VectorDataError::Storage(format!("Failed to store chunks: {e}")))?;

        Ok(chunk_ids)
    }

    #[tracing::instrument(skip(self, query), fields(query_dim = query.len(), limit))]
    async fn search(
        &self,
        query: Vec<f32>,
        limit: usize,
        correlation_id: &CorrelationId,
    ) -> VectorDataResult<Vec<SearchHit>> {
        self.check_dimension(&query)?;

        tracing::debug!(
            correlation_id = %correlation_id,
            collection = %self.collection_name,
            "Performing vector search"
        );

        let search_request = SearchPoints {
            collection_name: self.collection_name.clone(),
            vector: query,
            limit: limit as u64,
            with_payload: Some(true.into()),
            ..Default::default()
        };

        let response = self
            .client
            .search_points(search_request)
            .await
            .map_err(|e| VectorDataError::Storage(format!("Search failed: {e}")))?;

        let hits = response
            .result
            .into_iter()
            .map(|point| {
                let payload = &point.payload;
                SearchHit {
                    chunk_id: Uuid::try_parse(&payload_str(payload, "chunk_id"))
                        .unwrap_or_default(),
                    source: payload_str(payload, "source"),
                    position: payload
                        .get("position")
                        .and_then(Value::as_integer)
                        .and_then(|v| usize::try_from(v).ok())
                        .unwrap_or_default(),
                    text: payload_str(payload, "text"),
                    score: point.score,
                }
            })
            .collect();

        Ok(hits)
    }

    async fn get_stats(&self) -> VectorDataResult<StorageStats> {
        let request = GetCollectionInfoRequest {
            collection_name: self.collection_name.clone(),
        };

        let info = self
            .client
            .collection_info(request)
            .await
            .map_err(|e| VectorDataError::Storage(format!("Failed to get collection info: {e}")))?;

        let result = info
            .result
            .ok_or_else(|| VectorDataError::Storage("Missing collection info result".into()))?;

        Ok(StorageStats {
            vector_count: usize::try_from(result.points_count.unwrap_or(0)).unwrap_or(usize::MAX),
            collection_name: self.collection_name.clone(),
            storage_type: "qdrant".to_string(),
        })
    }
}
