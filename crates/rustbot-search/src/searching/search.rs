//! Search service implementation

use super::service::SearchService;
use crate::error::SearchError;
use async_trait::async_trait;
use rustbot_common::CorrelationId;
use rustbot_config::SearchConfig;
use rustbot_embeddings::EmbeddingService;
use rustbot_vector_data::{SearchHit, VectorStorage};
use std::sync::Arc;
use std::time::Duration;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Concatenate the text of every hit scoring above `minimum_similarity`
///
/// Each kept chunk is followed by a blank line. Hits are taken in the order
/// given.
///
/// # Errors
/// Returns `SearchError::NoMatchingKnowledge` when no hit clears the threshold
pub fn assemble_knowledge(hits: &[SearchHit], minimum_similarity: f32) -> SearchResult<String> {
    let knowledge: String = hits
        .iter()
        .filter(|hit| hit.score > minimum_similarity)
        .map(|hit| format!("{}\n\n", hit.text))
        .collect();

    if knowledge.is_empty() {
        return Err(SearchError::NoMatchingKnowledge { minimum_similarity });
    }

    Ok(knowledge)
}

/// Semantic search over the knowledge-base index
pub struct Search {
    embedding_service: Arc<dyn EmbeddingService>,
    vector_storage: Arc<dyn VectorStorage>,
    num_hits: usize,
    minimum_similarity: f32,
    search_timeout: Duration,
}

impl Search {
    /// Create a search service from shared embedding and storage services
    pub fn new(
        embedding_service: Arc<dyn EmbeddingService>,
        vector_storage: Arc<dyn VectorStorage>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            embedding_service,
            vector_storage,
            num_hits: config.num_hits,
            minimum_similarity: config.minimum_similarity,
            search_timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// Override the overall search timeout
    #[must_use]
    pub const fn with_timeout(mut self, search_timeout: Duration) -> Self {
        self.search_timeout = search_timeout;
        self
    }

    async fn try_search(
        &self,
        query: &str,
        limit: usize,
        correlation_id: &CorrelationId,
    ) -> SearchResult<Vec<SearchHit>> {
        tracing::debug!("Generating embedding for search query");
        let query_embedding = self
            .embedding_service
            .generate_embeddings(vec![query])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::EmbeddingFailed {
                correlation_id: correlation_id.clone(),
            })?;

        tracing::debug!("Performing vector search");
        let hits = self
            .vector_storage
            .search(query_embedding, limit, correlation_id)
            .await?;
        tracing::debug!(hit_count = hits.len(), "Vector search returned");

        Ok(hits)
    }
}

#[async_trait]
impl SearchService for Search {
    #[tracing::instrument(skip(self, query), fields(limit, correlation_id))]
    async fn search(
        &self,
        query: &str,
        limit: usize,
        correlation_id: &CorrelationId,
    ) -> SearchResult<Vec<SearchHit>> {
        tracing::Span::current().record("correlation_id", correlation_id.to_string());

        tokio::time::timeout(self.search_timeout, self.try_search(query, limit, correlation_id))
            .await
            .map_err(|_| {
                tracing::error!(
                    correlation_id = %correlation_id,
                    timeout = ?self.search_timeout,
                    "Search operation timed out"
                );
                SearchError::SearchTimeout {
                    timeout_ms: u64::try_from(self.search_timeout.as_millis()).unwrap_or(u64::MAX),
                    correlation_id: correlation_id.clone(),
                }
            })?
    }

    #[tracing::instrument(skip(self, question), fields(correlation_id))]
    async fn knowledge_for(
        &self,
        question: &str,
        correlation_id: &CorrelationId,
    ) -> SearchResult<String> {
        tracing::Span::current().record("correlation_id", correlation_id.to_string());

        let hits = self.search(question, self.num_hits, correlation_id).await?;
        let knowledge = assemble_knowledge(&hits, self.minimum_similarity)?;

        tracing::info!(
            correlation_id = %correlation_id,
            hit_count = hits.len(),
            used = hits
                .iter()
                .filter(|hit| hit.score > self.minimum_similarity)
                .count(),
            "Assembled knowledge"
        );

        Ok(knowledge)
    }
}
