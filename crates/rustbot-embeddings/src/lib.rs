//! Rustbot embedding generation crate
//!
//! Turns chunk and question text into vectors by calling an Ollama-compatible
//! embedding server, with batching, statistics and similarity helpers on top.

pub mod embedding;
pub mod error;

// Re-export main types
pub use embedding::{
    DefaultEmbeddingService, EmbeddingProvider, EmbeddingService, EmbeddingStats,
    OllamaEmbeddingProvider, cosine_similarity, text_difference,
};
pub use error::{EmbeddingError, EmbeddingResult};
pub use rustbot_config::EmbeddingConfig;

#[cfg(any(test, feature = "test-utils"))]
pub use embedding::MockEmbeddingProvider;
