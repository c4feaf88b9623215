//! Vector store trait

use async_trait::async_trait;

use crate::{Result, ScoredChunk};

/// Read side of a vector index
///
/// Stores are built once and only queried afterwards, so the trait exposes
/// no mutation.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return the `top_k` entries most similar to `vector`, best first
    async fn search_by_vector(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Get the total number of entries
    async fn count(&self) -> Result<usize>;

    /// Dimensionality shared by every stored vector
    fn dimension(&self) -> usize;
}
