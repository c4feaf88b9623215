//! Fixtures shared by the unit tests

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use regdoc_core::{Embedder, Error, GenerationConfig, GenerationResult, LLMProvider, Result};

use crate::embedder::HashEmbedder;

/// Write a PDF with one page per entry of `pages`, each holding one line of text
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Hash embedder that counts how many texts it has embedded
pub struct CountingEmbedder {
    inner: HashEmbedder,
    pub embedded: Arc<AtomicUsize>,
}

impl CountingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: HashEmbedder::new(64),
            embedded: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn embedded(&self) -> usize {
        self.embedded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embedded.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_documents(texts).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embedded.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_query(text).await
    }
}

/// Embedder whose model matches `CountingEmbedder` but whose server is down
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn model_id(&self) -> &str {
        "hash-md5-64"
    }

    async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Network("embedding server down".to_string()))
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::Network("embedding server down".to_string()))
    }
}

/// LLM that echoes the prompt it received, or fails while `failing` is set
pub struct ScriptedLlm {
    pub failing: std::sync::atomic::AtomicBool,
    pub last_prompt: std::sync::Mutex<Option<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            failing: std::sync::atomic::AtomicBool::new(false),
            last_prompt: std::sync::Mutex::new(None),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        self.generate_with_config(prompt, &GenerationConfig::default()).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset by peer".to_string()));
        }
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(GenerationResult {
            text: "Scripted answer".to_string(),
            model_id: config.model_id.clone(),
            tokens_used: None,
        })
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}
