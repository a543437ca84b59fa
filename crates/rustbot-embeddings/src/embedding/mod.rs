pub mod ollama;
pub mod service;
pub mod similarity;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use service::DefaultEmbeddingService;
pub use similarity::{cosine_similarity, text_difference};
pub use traits::{EmbeddingProvider, EmbeddingService, EmbeddingStats};
