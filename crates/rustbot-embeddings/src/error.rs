//! Error types for the rustbot-embeddings crate

use rustbot_common::CommonError;
use thiserror::Error;

/// Result type alias for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Error type for embedding operations
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Transport failures talking to the embedding server
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Embedding API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The server answered with something we cannot use
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    /// A vector does not have the configured length
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Client construction or settings errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error for other cases
    #[error("Other error: {0}")]
    Other(String),
}

impl CommonError for EmbeddingError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("Request timed out: {err}"))
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
