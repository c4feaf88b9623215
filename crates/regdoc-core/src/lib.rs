//! Core traits and types for regdoc
//!
//! This crate defines the fundamental traits and types used across the regdoc
//! pipeline: LLM providers, embedding models, vector stores and RAG engines,
//! plus the page/chunk/answer data model they exchange.

pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod types;
pub mod vector_store;

pub use embedding::{Embedder, cosine_similarity, normalize_l2};
pub use error::{Error, ErrorKind, Result};
pub use llm::{GenerationConfig, GenerationResult, LLMProvider};
pub use rag::{RAGEngine, RAGQuery, RAGResult};
pub use types::*;
pub use vector_store::VectorStore;
