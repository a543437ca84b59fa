//! Error types for vector data storage operations

use thiserror::Error;

/// Result type alias for vector data operations
pub type VectorDataResult<T> = Result<T, VectorDataError>;

/// Errors that can occur during vector storage operations
#[derive(Error, Debug)]
pub enum VectorDataError {
    /// Storage backend is unavailable or connection failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A vector does not match the collection's dimension
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Collection/index operations failed
    #[error("Collection operation failed: {0}")]
    CollectionError(String),

    /// Storage backend specific error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}
