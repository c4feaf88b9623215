//! Embedding model implementations

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regdoc_core::{Embedder, Error, Result, normalize_l2};

use crate::config::{EmbeddingBackend, EmbeddingConfig};

/// Build the embedder selected by the configuration
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::Ollama => Ok(Arc::new(OllamaEmbedder::new(config)?)),
        EmbeddingBackend::Hash => Ok(Arc::new(HashEmbedder::new(config.hash_dimension))),
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

/// Sentence-embedding model served over an Ollama-compatible `/api/embed` endpoint
///
/// Vectors are L2-normalized on receipt, whatever the server returns.
pub struct OllamaEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    batch_size: usize,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(Error::Configuration("missing embedding model name".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let endpoint = format!("{}/api/embed", config.base_url.trim_end_matches('/'));

        tracing::info!("Embedding model {} at {}", config.model, endpoint);

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            batch_size: config.batch_size.max(1),
        })
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbedRequest {
            model: &self.model,
            input: inputs,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(e.to_string())
                } else {
                    Error::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("Embedding API error: {} - {}", status, body.trim());
            return Err(if status.is_server_error() {
                Error::ServiceUnavailable(message)
            } else {
                Error::Embedding(message)
            });
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Malformed embedding response: {}", e)))?;

        if parsed.embeddings.len() != inputs.len() {
            return Err(Error::Embedding(format!(
                "Embedding API returned {} vectors for {} inputs",
                parsed.embeddings.len(),
                inputs.len()
            )));
        }

        Ok(parsed
            .embeddings
            .into_iter()
            .map(|mut vector| {
                normalize_l2(&mut vector);
                vector
            })
            .collect())
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                "Embedding batch {} ({} texts)",
                batch_index + 1,
                batch.len()
            );
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Empty embeddings array".to_string()))
    }
}

fn word_pattern() -> &'static Regex {
    static WORDS: OnceLock<Regex> = OnceLock::new();
    WORDS.get_or_init(|| Regex::new(r"\w+").expect("static regex"))
}

/// Deterministic feature-hashing embedder
///
/// Each lowercase word and each adjacent word pair is hashed with MD5 into a
/// few buckets of a fixed-size vector, which is then L2-normalized. Texts
/// sharing vocabulary land close together; no model download is needed.
/// Text without any word characters is hashed as a single feature, so every
/// vector has unit norm.
pub struct HashEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_id: format!("hash-md5-{}", dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn bucket(&self, feature: &str) -> (usize, usize) {
        let digest = md5::compute(feature.as_bytes());
        let bytes = digest.0;
        let first = u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]);
        let second = u64::from_le_bytes([
            bytes[8], bytes[9], bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
        ]);
        (
            (first % self.dimension as u64) as usize,
            (second % self.dimension as u64) as usize,
        )
    }

    /// Embed synchronously
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = word_pattern()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let mut embedding = vec![0.0f32; self.dimension];

        for word in &words {
            let (primary, secondary) = self.bucket(word);
            embedding[primary] += 1.0;
            embedding[secondary] += 0.5;
        }

        for pair in words.windows(2) {
            let (primary, _) = self.bucket(&format!("{} {}", pair[0], pair[1]));
            embedding[primary] += 0.8;
        }

        if words.is_empty() {
            // Punctuation-only text (dot leaders, rules) hashes as a whole
            let (primary, _) = self.bucket(&format!("\u{0}{}", lowered.trim()));
            embedding[primary] += 1.0;
        }

        normalize_l2(&mut embedding);
        embedding
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }
}
