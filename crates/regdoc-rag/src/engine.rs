//! Retrieve-then-generate question answering

use async_trait::async_trait;
use std::sync::Arc;

use regdoc_core::{
    Answer, Embedder, Error, LLMProvider, RAGEngine, RAGQuery, RAGResult, Result, ScoredChunk,
    VectorStore,
};

use crate::config::DEFAULT_TOP_K;

/// Fill the fixed instruction template
///
/// Placeholders are filled in one pass, so braces in the context or the
/// question are copied literally.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Use the following pieces of context to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
----------------
{context}
----------------
Question: {question}
Answer:"
    )
}

/// Stateless QA chain over a read-only index
pub struct RetrievalQa {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LLMProvider>,
    top_k: usize,
}

impl RetrievalQa {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LLMProvider>,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[async_trait]
impl RAGEngine for RetrievalQa {
    async fn retrieve(&self, query: &RAGQuery) -> Result<RAGResult> {
        let vector = self.embedder.embed_query(&query.query).await?;
        let chunks = self.store.search_by_vector(&vector, query.top_k).await?;
        let context = self.build_context(&chunks);

        Ok(RAGResult { chunks, context })
    }

    fn build_context(&self, chunks: &[ScoredChunk]) -> String {
        chunks
            .iter()
            .map(|scored| scored.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    async fn answer(&self, question: &str) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("Please enter a question".to_string()));
        }

        let query = RAGQuery {
            query: question.to_string(),
            top_k: self.top_k,
        };
        let retrieved = self.retrieve(&query).await?;
        tracing::debug!(
            "Retrieved {} chunks for question ({} chars)",
            retrieved.chunks.len(),
            question.chars().count()
        );

        let prompt = build_prompt(&retrieved.context, question);
        let generation = self.llm.generate(&prompt).await?;

        Ok(Answer {
            text: generation.text,
            citations: retrieved
                .chunks
                .iter()
                .map(|scored| scored.chunk.citation())
                .collect(),
        })
    }
}
