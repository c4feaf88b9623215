//! RAG (Retrieval-Augmented Generation) engine trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Answer, Result, ScoredChunk};

/// Query for RAG retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGQuery {
    pub query: String,
    pub top_k: usize,
}

impl Default for RAGQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: 6,
        }
    }
}

/// Result from RAG retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGResult {
    /// Retrieved chunks, best match first
    pub chunks: Vec<ScoredChunk>,
    pub context: String,
}

/// Trait for RAG engines
///
/// An engine answers one question per call and keeps no state between calls.
#[async_trait]
pub trait RAGEngine: Send + Sync {
    /// Retrieve relevant chunks for a query
    async fn retrieve(&self, query: &RAGQuery) -> Result<RAGResult>;

    /// Build the context block handed to the LLM
    fn build_context(&self, chunks: &[ScoredChunk]) -> String;

    /// Retrieve, generate, and attach citations
    async fn answer(&self, question: &str) -> Result<Answer>;
}
