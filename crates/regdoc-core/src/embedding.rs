//! Embedding model trait

use async_trait::async_trait;

use crate::Result;

/// Maps text to fixed-length vectors
///
/// Every vector returned by an implementation has the same dimensionality and
/// unit L2 norm. Chunks and queries must be embedded by the same model for
/// similarity scores to mean anything.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the underlying model, recorded next to persisted vectors
    fn model_id(&self) -> &str;

    /// Embed a batch of document chunks, preserving order
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left untouched.
pub fn normalize_l2(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for value in vector.iter_mut() {
            *value /= magnitude;
        }
    }
}

/// Cosine similarity of two vectors, 0.0 when lengths differ or either is zero
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
