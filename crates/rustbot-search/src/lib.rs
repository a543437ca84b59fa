//! Rustbot retrieval crate
//!
//! Embeds a question, asks the vector index for its nearest chunks and turns
//! the ones similar enough into a knowledge block for the chat prompt.

pub mod error;
pub mod searching;

// Re-export main types
pub use error::SearchError;
pub use searching::{
    search::{Search, SearchResult, assemble_knowledge},
    service::SearchService,
};
pub use rustbot_vector_data::SearchHit;

// Re-export test utilities when test-utils feature is enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_mocks {
    pub use crate::searching::test_utils::MockSearch;
}
