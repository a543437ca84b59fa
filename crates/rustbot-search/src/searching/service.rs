//! Search service trait

use super::SearchResult;
use async_trait::async_trait;
use rustbot_common::CorrelationId;
use rustbot_vector_data::SearchHit;

/// Trait for retrieval operations with correlation ID support
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Return up to `limit` stored chunks nearest to `query`, best first
    async fn search(
        &self,
        query: &str,
        limit: usize,
        correlation_id: &CorrelationId,
    ) -> SearchResult<Vec<SearchHit>>;

    /// Build the knowledge block used to ground an answer to `question`
    ///
    /// Fails with `SearchError::NoMatchingKnowledge` when no hit is similar
    /// enough.
    async fn knowledge_for(
        &self,
        question: &str,
        correlation_id: &CorrelationId,
    ) -> SearchResult<String>;
}
