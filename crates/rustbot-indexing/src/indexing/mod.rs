pub mod documents;
pub mod indexer;
pub mod service;

pub use documents::{FileContent, collect_documents};
pub use indexer::{IndexResult, Indexer};
pub use service::IndexerService;

#[cfg(any(test, feature = "test-utils"))]
pub use service::test_utils;
