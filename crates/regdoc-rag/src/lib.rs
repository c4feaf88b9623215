//! PDF ingestion and retrieval for regdoc
//!
//! This crate turns one PDF into a persistent vector index and answers
//! questions against it: loading, RTL normalization, recursive chunking,
//! embedding, persistence and the retrieval QA chain.

mod chunker;
mod config;
mod embedder;
mod engine;
mod index;
mod ingest;
mod loader;
mod normalizer;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use chunker::RecursiveTextSplitter;
pub use config::{
    ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_INDEX_DIR,
    DEFAULT_PDF_PATH, DEFAULT_SEPARATORS, DEFAULT_TOP_K, EmbeddingBackend, EmbeddingConfig,
    RagConfig, ReusePolicy,
};
pub use embedder::{HashEmbedder, OllamaEmbedder, build_embedder};
pub use engine::{RetrievalQa, build_prompt};
pub use index::{ENTRIES_FILE, IndexManifest, MANIFEST_FILE, PersistentVectorIndex};
pub use ingest::{IndexBuilder, IndexOutcome};
pub use loader::PdfLoader;
pub use normalizer::{IdentityNormalizer, RtlDisplayNormalizer, TextNormalizer, reshape_arabic};

// Re-export core types for convenience
pub use regdoc_core::{
    Answer, Citation, Embedder, Error, LLMProvider, RAGEngine, RAGQuery, RAGResult, Result,
    VectorStore,
};
