//! Pipeline configuration

use regdoc_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default document: the faculty's internal regulations, October 2019 edition
pub const DEFAULT_PDF_PATH: &str =
    "./اللائحة الداخلية لكلية الحاسبات والذكاء الاصطناعي أكتوبر 2019.pdf";
pub const DEFAULT_INDEX_DIR: &str = "./fcai_regulations_index";
pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
pub const DEFAULT_TOP_K: usize = 6;

/// Paragraph, line, sentence, word
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", ".", " "];

/// How an existing persisted index is judged reusable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReusePolicy {
    /// Reuse whenever the index directory exists, even if the PDF changed
    DirectoryPresence,
    /// Reuse only if the PDF digest and embedding model match the manifest
    ContentHash,
}

impl FromStr for ReusePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "directory" | "directory_presence" | "presence" => Ok(ReusePolicy::DirectoryPresence),
            "hash" | "content_hash" | "md5" => Ok(ReusePolicy::ContentHash),
            other => Err(Error::Configuration(format!("Unknown reuse policy: {}", other))),
        }
    }
}

/// Which embedding implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Sentence-embedding model served by an Ollama-compatible `/api/embed` endpoint
    Ollama,
    /// Deterministic feature hashing, no model server required
    Hash,
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(EmbeddingBackend::Ollama),
            "hash" | "local" => Ok(EmbeddingBackend::Hash),
            other => Err(Error::Configuration(format!("Unknown embedding backend: {}", other))),
        }
    }
}

/// Embedding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model: String,
    pub base_url: String,
    pub batch_size: usize,
    pub timeout_secs: u64,
    /// Vector length of the hash backend
    pub hash_dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            model: "paraphrase-multilingual".to_string(),
            base_url: "http://localhost:11434".to_string(),
            batch_size: 32,
            timeout_secs: 300,
            hash_dimension: 384,
        }
    }
}

/// Chunking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Configuration for ingestion and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    pub pdf_path: PathBuf,
    pub index_dir: PathBuf,
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub embedding: EmbeddingConfig,
    pub reuse_policy: ReusePolicy,
    /// Reshape and visually reorder right-to-left text before chunking
    pub normalize_rtl: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from(DEFAULT_PDF_PATH),
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            chunking: ChunkingConfig::default(),
            top_k: DEFAULT_TOP_K,
            embedding: EmbeddingConfig::default(),
            reuse_policy: ReusePolicy::ContentHash,
            normalize_rtl: true,
        }
    }
}

impl RagConfig {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(path) = env::var("REGDOC_PDF_PATH") {
            config.pdf_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("REGDOC_INDEX_DIR") {
            config.index_dir = PathBuf::from(dir);
        }
        if let Some(size) = parse_var("REGDOC_CHUNK_SIZE")? {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = parse_var("REGDOC_CHUNK_OVERLAP")? {
            config.chunking.chunk_overlap = overlap;
        }
        if let Some(top_k) = parse_var("REGDOC_TOP_K")? {
            config.top_k = top_k;
        }
        if let Some(policy) = parse_var("REGDOC_REUSE_POLICY")? {
            config.reuse_policy = policy;
        }
        if let Some(normalize) = parse_var("REGDOC_NORMALIZE_RTL")? {
            config.normalize_rtl = normalize;
        }
        if let Some(backend) = parse_var("REGDOC_EMBEDDING_BACKEND")? {
            config.embedding.backend = backend;
        }
        if let Ok(model) = env::var("REGDOC_EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(url) = env::var("OLLAMA_URL") {
            config.embedding.base_url = url;
        }
        if let Some(batch) = parse_var("REGDOC_EMBEDDING_BATCH")? {
            config.embedding.batch_size = batch;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Configuration("chunk size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Configuration(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.chunking.separators.is_empty() {
            return Err(Error::Configuration("at least one separator is required".to_string()));
        }
        if self.top_k == 0 {
            return Err(Error::Configuration("top_k must be at least 1".to_string()));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::Configuration("embedding batch size must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Configuration(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_default_config_snapshot() {
        let mut config = RagConfig::default();
        config.pdf_path = PathBuf::from("./regulations.pdf");

        assert_yaml_snapshot!(config, @r#"
        pdf_path: "./regulations.pdf"
        index_dir: "./fcai_regulations_index"
        chunking:
          chunk_size: 800
          chunk_overlap: 100
          separators:
            - "\n\n"
            - "\n"
            - "."
            - " "
        top_k: 6
        embedding:
          backend: ollama
          model: paraphrase-multilingual
          base_url: "http://localhost:11434"
          batch_size: 32
          timeout_secs: 300
          hash_dimension: 384
        reuse_policy: content_hash
        normalize_rtl: true
        "#);
    }

    #[test]
    fn test_validate_rejects_overlap_not_smaller_than_size() {
        let mut config = RagConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let config = RagConfig {
            top_k: 0,
            ..RagConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reuse_policy_from_str() {
        assert_eq!("hash".parse::<ReusePolicy>().unwrap(), ReusePolicy::ContentHash);
        assert_eq!(
            "Directory".parse::<ReusePolicy>().unwrap(),
            ReusePolicy::DirectoryPresence
        );
        assert!("sometimes".parse::<ReusePolicy>().is_err());
    }

    #[test]
    fn test_embedding_backend_from_str() {
        assert_eq!("OLLAMA".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Ollama);
        assert_eq!("hash".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Hash);
        assert!("openai".parse::<EmbeddingBackend>().is_err());
    }
}
