//! Test utilities for search services

use super::search::{SearchResult, assemble_knowledge};
use super::service::SearchService;
use crate::SearchError;

use async_trait::async_trait;
use rustbot_common::CorrelationId;
use rustbot_vector_data::SearchHit;

/// Type alias for test search results (source, text, similarity)
type TestSearchResult = (String, String, f32);

/// Mock search service for testing
pub struct MockSearch {
    results: Vec<SearchHit>,
    minimum_similarity: f32,
    fail: bool,
}

impl MockSearch {
    /// Create a mock that returns specific results
    pub fn with_results(results: Vec<TestSearchResult>) -> Self {
        let results = results
            .into_iter()
            .enumerate()
            .map(|(index, (source, text, score))| SearchHit {
                chunk_id: rustbot_vector_data::generate_chunk_id(&source, index),
                source,
                position: index.saturating_add(1),
                text,
                score,
            })
            .collect();

        Self {
            results,
            minimum_similarity: 0.5,
            fail: false,
        }
    }

    /// Create a mock that returns no results
    pub fn empty() -> Self {
        Self::with_results(vec![])
    }

    /// Create a mock whose searches fail with a timeout
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    #[must_use]
    pub const fn with_minimum_similarity(mut self, minimum_similarity: f32) -> Self {
        self.minimum_similarity = minimum_similarity;
        self
    }
}

#[async_trait]
impl SearchService for MockSearch {
    async fn search(
        &self,
        _query: &str,
        limit: usize,
        correlation_id: &CorrelationId,
    ) -> SearchResult<Vec<SearchHit>> {
        if self.fail {
            return Err(SearchError::SearchTimeout {
                timeout_ms: 0,
                correlation_id: correlation_id.clone(),
            });
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }

    async fn knowledge_for(
        &self,
        question: &str,
        correlation_id: &CorrelationId,
    ) -> SearchResult<String> {
        let hits = self.search(question, self.results.len(), correlation_id).await?;
        assemble_knowledge(&hits, self.minimum_similarity)
    }
}
