//! Search service module for querying the knowledge base
pub mod search;
pub mod service;

pub use search::{Search, SearchResult, assemble_knowledge};
pub use service::SearchService;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
