//! Google Gemini integration for regdoc
//!
//! This crate provides the Gemini implementation of the LLMProvider trait.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::GeminiClient;
pub use config::{DEFAULT_API_URL, DEFAULT_MODEL, GeminiConfig};

// Re-export core types for convenience
pub use regdoc_core::{Error, GenerationConfig, GenerationResult, LLMProvider, Result};
