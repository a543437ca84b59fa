//! Error types for the chunking crate

use thiserror::Error;

/// Chunking-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    /// A heading split produced an empty block, e.g. two headings of the same
    /// level with nothing between them. The whole document is rejected.
    #[error("Document produced nothing: empty block at heading level {level}")]
    EmptyBlock { level: usize },
}

/// Result type alias for chunking operations
pub type ChunkingResult<T> = Result<T, ChunkingError>;
