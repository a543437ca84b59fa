//! Vector similarity helpers

use super::traits::EmbeddingService;
use crate::{EmbeddingError, EmbeddingResult};
use rustbot_common::CommonError;

/// Cosine similarity of two vectors
///
/// Returns 0.0 when either vector has zero length.
///
/// # Errors
/// Returns `EmbeddingError::DimensionMismatch` for vectors of different length
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> EmbeddingResult<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Semantic similarity of two texts, as the cosine of their embeddings
///
/// # Errors
/// Returns embedding errors from the service
pub async fn text_difference(
    service: &dyn EmbeddingService,
    first: &str,
    second: &str,
) -> EmbeddingResult<f32> {
    let embeddings = service.generate_embeddings(vec![first, second]).await?;
    match embeddings.as_slice() {
        [a, b] => cosine_similarity(a, b),
        _ => Err(EmbeddingError::parse_error("expected two embeddings")),
    }
}
