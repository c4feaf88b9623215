//! Persistent vector index
//!
//! An index directory holds two JSON files: `entries.json` with every
//! (vector, chunk) pair and `manifest.json` describing how they were built.
//! The manifest is written last, so a directory without one is an
//! interrupted build.
//!
//! Rebuilds are written to a sibling staging directory and swapped in only
//! once complete. A directory holding anything besides the two index files
//! is never replaced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use regdoc_core::{Error, IndexEntry, Result, ScoredChunk, VectorStore, cosine_similarity};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const ENTRIES_FILE: &str = "entries.json";

/// Build metadata persisted next to the entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub model_id: String,
    pub dimension: usize,
    pub source: String,
    /// Hex MD5 of the PDF bytes the index was built from
    pub source_md5: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub entry_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntriesFile {
    entries: Vec<IndexEntry>,
}

/// Read-only vector index backed by a directory on disk
#[derive(Debug)]
pub struct PersistentVectorIndex {
    dir: PathBuf,
    manifest: IndexManifest,
    entries: Vec<IndexEntry>,
}

impl PersistentVectorIndex {
    /// Whether `dir` holds a completed index
    pub fn exists(dir: &Path) -> bool {
        dir.join(MANIFEST_FILE).is_file()
    }

    /// Persist `entries` into `dir` and return the opened index
    ///
    /// `manifest.dimension` and `manifest.entry_count` are overwritten from
    /// the entries themselves.
    pub fn create(dir: &Path, mut manifest: IndexManifest, entries: Vec<IndexEntry>) -> Result<Self> {
        let dimension = entries.first().map(|e| e.embedding.len()).unwrap_or(0);
        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimension) {
            return Err(Error::VectorStore(format!(
                "Entry {} has dimension {}, expected {}",
                bad.id,
                bad.embedding.len(),
                dimension
            )));
        }

        manifest.dimension = dimension;
        manifest.entry_count = entries.len();

        fs::create_dir_all(dir)?;

        let entries_file = EntriesFile { entries };
        fs::write(dir.join(ENTRIES_FILE), serde_json::to_string(&entries_file)?)?;
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        tracing::debug!(
            "Persisted {} entries to {}",
            manifest.entry_count,
            dir.display()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            manifest,
            entries: entries_file.entries,
        })
    }

    /// Open a previously persisted index
    pub fn open(dir: &Path) -> Result<Self> {
        let manifest = Self::read_manifest(dir)?;

        let content = fs::read_to_string(dir.join(ENTRIES_FILE))?;
        let entries_file: EntriesFile = serde_json::from_str(&content)
            .map_err(|e| Error::VectorStore(format!("Corrupt {}: {}", ENTRIES_FILE, e)))?;

        if entries_file.entries.len() != manifest.entry_count {
            return Err(Error::VectorStore(format!(
                "Manifest lists {} entries but {} were found",
                manifest.entry_count,
                entries_file.entries.len()
            )));
        }
        if entries_file
            .entries
            .iter()
            .any(|e| e.embedding.len() != manifest.dimension)
        {
            return Err(Error::VectorStore(format!(
                "Entries do not all have dimension {}",
                manifest.dimension
            )));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            manifest,
            entries: entries_file.entries,
        })
    }

    /// Fail unless `dir` is absent or holds nothing but index files
    pub fn check_replaceable(dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }
        if !dir.is_dir() {
            return Err(Error::Configuration(format!(
                "Index path {} exists and is not a directory",
                dir.display()
            )));
        }

        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name();
            if name != MANIFEST_FILE && name != ENTRIES_FILE {
                return Err(Error::Configuration(format!(
                    "Index directory {} contains {:?}, refusing to overwrite it",
                    dir.display(),
                    name
                )));
            }
        }
        Ok(())
    }

    /// Fresh sibling path of `dir` tagged with `tag`, e.g. `index.building-<uuid>`
    pub fn sibling_path(dir: &Path, tag: &str) -> Result<PathBuf> {
        let name = dir.file_name().ok_or_else(|| {
            Error::Configuration(format!(
                "Index path {} does not name a directory",
                dir.display()
            ))
        })?;
        Ok(dir.with_file_name(format!(
            "{}.{}-{}",
            name.to_string_lossy(),
            tag,
            uuid::Uuid::new_v4().simple()
        )))
    }

    /// Move this index to `dir`, replacing the index already there
    ///
    /// The previous index stays in place until the new one has been renamed
    /// over it.
    pub fn install(mut self, dir: &Path) -> Result<Self> {
        Self::check_replaceable(dir)?;

        let retired = if dir.exists() {
            let retired = Self::sibling_path(dir, "retired")?;
            fs::rename(dir, &retired)?;
            Some(retired)
        } else {
            None
        };

        if let Err(e) = fs::rename(&self.dir, dir) {
            if let Some(retired) = &retired {
                if let Err(restore) = fs::rename(retired, dir) {
                    tracing::error!(
                        "Failed to restore previous index from {}: {}",
                        retired.display(),
                        restore
                    );
                }
            }
            return Err(Error::Io(e));
        }

        if let Some(retired) = retired {
            if let Err(e) = Self::remove_index_files(&retired) {
                tracing::warn!("Failed to remove old index {}: {}", retired.display(), e);
            }
        }

        self.dir = dir.to_path_buf();
        Ok(self)
    }

    /// Delete the index files in `dir` and then the directory, which must be empty
    pub fn remove_index_files(dir: &Path) -> Result<()> {
        for file in [MANIFEST_FILE, ENTRIES_FILE] {
            match fs::remove_file(dir.join(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        fs::remove_dir(dir)?;
        Ok(())
    }

    /// Read only the manifest of the index in `dir`
    pub fn read_manifest(dir: &Path) -> Result<IndexManifest> {
        let content = fs::read_to_string(dir.join(MANIFEST_FILE))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::VectorStore(format!("Corrupt {}: {}", MANIFEST_FILE, e)))
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `top_k` entries by cosine similarity, best first
    pub fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        if !self.entries.is_empty() && vector.len() != self.manifest.dimension {
            return Err(Error::VectorStore(format!(
                "Query vector has dimension {}, index has {}",
                vector.len(),
                self.manifest.dimension
            )));
        }

        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(vector, &entry.embedding), entry))
            .collect();

        // Stable sort keeps document order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, entry)| ScoredChunk {
                chunk: entry.chunk.clone(),
                score,
            })
            .collect())
    }
}

#[async_trait]
impl VectorStore for PersistentVectorIndex {
    async fn search_by_vector(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        self.search(vector, top_k)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    fn dimension(&self) -> usize {
        self.manifest.dimension
    }
}
