//! Common types shared by every stage of the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of the source document as extracted by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Identifier of the source file (the path it was loaded from)
    pub source: String,
    /// Zero-based page index
    pub page: u32,
    pub content: String,
}

/// A bounded slice of page text, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub source: String,
    /// Zero-based index of the page this chunk was cut from
    pub page: u32,
    /// Position of the chunk in the document, in split order
    pub chunk_index: usize,
    pub content: String,
}

impl Chunk {
    /// Citation pointing back at the page this chunk came from
    pub fn citation(&self) -> Citation {
        Citation {
            source: self.source.clone(),
            page: self.page,
        }
    }
}

/// A persisted (vector, chunk) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub embedding: Vec<f32>,
    pub chunk: Chunk,
}

/// A chunk returned by a similarity search together with its score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Reference to a page of the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    /// Zero-based page index
    pub page: u32,
}

/// Pages are shown with the same zero-based index the loader stored
impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | page {}", self.source, self.page)
    }
}

/// Answer to a single question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// One citation per retrieved chunk, best match first. Never deduplicated.
    pub citations: Vec<Citation>,
}

impl Answer {
    /// Render the answer followed by its sources section, one line per citation
    pub fn render(&self) -> String {
        let sources = self
            .citations
            .iter()
            .map(|citation| format!("  • {}", citation))
            .collect::<Vec<_>>()
            .join("\n");

        format!("{}\n\n📚 Sources:\n{}", self.text, sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn citation(source: &str, page: u32) -> Citation {
        Citation {
            source: source.to_string(),
            page,
        }
    }

    #[test]
    fn test_citation_display_uses_stored_page_index() {
        assert_eq!(citation("regulations.pdf", 0).to_string(), "regulations.pdf | page 0");
        assert_eq!(citation("regulations.pdf", 11).to_string(), "regulations.pdf | page 11");
    }

    #[test]
    fn test_answer_render_keeps_duplicate_citations_in_order() {
        let answer = Answer {
            text: "Students must complete 136 credit hours.".to_string(),
            citations: vec![
                citation("regulations.pdf", 4),
                citation("regulations.pdf", 4),
                citation("regulations.pdf", 1),
            ],
        };

        assert_snapshot!(answer.render(), @r"
        Students must complete 136 credit hours.

        📚 Sources:
          • regulations.pdf | page 4
          • regulations.pdf | page 4
          • regulations.pdf | page 1
        ");
    }

    #[test]
    fn test_chunk_citation() {
        let chunk = Chunk {
            source: "doc.pdf".to_string(),
            page: 3,
            chunk_index: 9,
            content: "text".to_string(),
        };
        assert_eq!(chunk.citation(), citation("doc.pdf", 3));
    }
}
