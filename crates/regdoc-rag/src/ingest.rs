//! Index construction
//!
//! Load the PDF, normalize, chunk, embed and persist, or reuse the index
//! already on disk when the reuse policy allows it.

use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use regdoc_core::{Embedder, Error, IndexEntry, Result};

use crate::chunker::RecursiveTextSplitter;
use crate::config::{RagConfig, ReusePolicy};
use crate::index::{IndexManifest, PersistentVectorIndex};
use crate::loader::PdfLoader;
use crate::normalizer::{IdentityNormalizer, RtlDisplayNormalizer, TextNormalizer};

/// What [`IndexBuilder::build_or_load`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    Reused { entries: usize },
    Built { entries: usize },
}

impl IndexOutcome {
    pub fn entries(&self) -> usize {
        match self {
            IndexOutcome::Reused { entries } | IndexOutcome::Built { entries } => *entries,
        }
    }
}

/// Builds the persistent index for one PDF
pub struct IndexBuilder {
    config: RagConfig,
    embedder: Arc<dyn Embedder>,
    normalizer: Box<dyn TextNormalizer>,
}

impl IndexBuilder {
    pub fn new(config: RagConfig, embedder: Arc<dyn Embedder>) -> Self {
        let normalizer: Box<dyn TextNormalizer> = if config.normalize_rtl {
            Box::new(RtlDisplayNormalizer::new())
        } else {
            Box::new(IdentityNormalizer)
        };

        Self {
            config,
            embedder,
            normalizer,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn TextNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Reuse the persisted index if the policy allows, otherwise build it
    ///
    /// A missing PDF is fatal even when a persisted index exists. A stale
    /// index is replaced only after its successor is fully written, and an
    /// index directory holding files other than the index is never touched.
    pub async fn build_or_load(&self) -> Result<(PersistentVectorIndex, IndexOutcome)> {
        let pdf_path = &self.config.pdf_path;
        let pdf_bytes = fs::read(pdf_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("PDF not found: {}", pdf_path.display()),
                ))
            } else {
                Error::Io(e)
            }
        })?;
        let source_md5 = format!("{:x}", md5::compute(&pdf_bytes));
        drop(pdf_bytes);

        let index_dir = &self.config.index_dir;

        if PersistentVectorIndex::exists(index_dir) {
            if self.is_reusable(&source_md5)? {
                tracing::info!("Loading existing vector store from {}", index_dir.display());
                let index = PersistentVectorIndex::open(index_dir)?;
                let entries = index.len();
                return Ok((index, IndexOutcome::Reused { entries }));
            }

            tracing::info!(
                "Persisted index at {} is stale, rebuilding",
                index_dir.display()
            );
        } else if index_dir.exists() {
            tracing::warn!(
                "Index directory {} has no manifest, rebuilding",
                index_dir.display()
            );
        }

        // Checked before any work so a misconfigured path fails fast
        PersistentVectorIndex::check_replaceable(index_dir)?;
        let staging = PersistentVectorIndex::sibling_path(index_dir, "building")?;

        tracing::info!("Creating new vector store in {}", index_dir.display());
        let staged = match self.build(&staging, source_md5).await {
            Ok(index) => index,
            Err(e) => {
                if staging.exists() {
                    if let Err(cleanup) = PersistentVectorIndex::remove_index_files(&staging) {
                        tracing::warn!(
                            "Failed to remove staging directory {}: {}",
                            staging.display(),
                            cleanup
                        );
                    }
                }
                return Err(e);
            }
        };
        let index = staged.install(index_dir)?;
        let entries = index.len();
        tracing::info!("Vector store created with {} entries", entries);

        Ok((index, IndexOutcome::Built { entries }))
    }

    fn is_reusable(&self, source_md5: &str) -> Result<bool> {
        let manifest = PersistentVectorIndex::read_manifest(&self.config.index_dir)?;
        let model_matches = manifest.model_id == self.embedder.model_id();

        match self.config.reuse_policy {
            ReusePolicy::DirectoryPresence => {
                if !model_matches {
                    return Err(Error::Configuration(format!(
                        "Index at {} was built with embedding model {}, configured model is {}",
                        self.config.index_dir.display(),
                        manifest.model_id,
                        self.embedder.model_id()
                    )));
                }
                Ok(true)
            }
            ReusePolicy::ContentHash => {
                if manifest.source_md5 != source_md5 {
                    tracing::debug!("PDF digest changed: {} -> {}", manifest.source_md5, source_md5);
                }
                Ok(model_matches && manifest.source_md5 == source_md5)
            }
        }
    }

    async fn build(&self, dir: &Path, source_md5: String) -> Result<PersistentVectorIndex> {
        let mut pages = PdfLoader::load_async(&self.config.pdf_path).await?;
        self.normalizer.normalize_pages(&mut pages);

        let splitter = RecursiveTextSplitter::from_config(&self.config.chunking);
        let chunks = splitter.split_pages(&pages);
        tracing::info!("Split {} pages into {} chunks", pages.len(), chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_documents(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry {
                id: uuid::Uuid::new_v4().to_string(),
                embedding,
                chunk,
            })
            .collect();

        let manifest = IndexManifest {
            model_id: self.embedder.model_id().to_string(),
            dimension: 0,
            source: self.config.pdf_path.display().to_string(),
            source_md5,
            chunk_size: self.config.chunking.chunk_size,
            chunk_overlap: self.config.chunking.chunk_overlap,
            entry_count: 0,
            created_at: Utc::now(),
        };

        PersistentVectorIndex::create(dir, manifest, entries)
    }
}
