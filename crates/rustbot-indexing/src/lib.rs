//! Knowledge-base ingestion for rustbot
//!
//! Reads the markdown knowledge base, chunks each document, embeds the chunks
//! and stores them in the vector index.

pub mod error;
pub mod indexing;

// Re-export error types
pub use error::{IndexerError, IndexerResult};

// Re-export main orchestration types
pub use indexing::{FileContent, IndexResult, Indexer, IndexerService, collect_documents};

// Re-export test utilities when test-utils feature is enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_mocks {
    pub use crate::indexing::test_utils::MockIndexerService;
}
