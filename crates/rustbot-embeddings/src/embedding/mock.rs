//! Deterministic in-process embedding provider for tests

use super::traits::EmbeddingProvider;
use crate::{EmbeddingError, EmbeddingResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock provider producing stable vectors derived from the text bytes
///
/// Equal texts get equal vectors, so similarity searches over mock
/// embeddings behave predictably.
pub struct MockEmbeddingProvider {
    dimension: usize,
    fail: bool,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of `embed_batch` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The vector this provider returns for `text`
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension.max(1)];
        let len = vector.len();
        for (index, byte) in text.bytes().enumerate() {
            if let Some(slot) = vector.get_mut(index % len) {
                *slot += f32::from(byte) / 255.0;
            }
        }
        if let Some(first) = vector.first_mut() {
            *first += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(EmbeddingError::Other("Mock embedding failure".into()));
        }

        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embedding-model"
    }
}
