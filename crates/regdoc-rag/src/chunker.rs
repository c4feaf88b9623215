//! Recursive character text splitter
//!
//! Text is cut on the highest-priority separator it contains. Pieces shorter
//! than the chunk size are merged greedily into windows; pieces that are
//! still too long are split again with the remaining separators. The tail of
//! each window, up to `chunk_overlap` characters, is carried into the next
//! one. Lengths are counted in chars.

use regdoc_core::{Chunk, Page};

use crate::config::ChunkingConfig;

/// Splits page text into overlapping windows
#[derive(Debug, Clone)]
pub struct RecursiveTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveTextSplitter {
    /// Create a splitter; `chunk_overlap` must be smaller than `chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize, separators: Vec<String>) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap, config.separators.clone())
    }

    /// Split every page, numbering chunks across the whole document
    pub fn split_pages(&self, pages: &[Page]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for page in pages {
            for content in self.split_text(&page.content) {
                chunks.push(Chunk {
                    source: page.source.clone(),
                    page: page.page,
                    chunk_index: chunks.len(),
                    content,
                });
            }
        }
        chunks
    }

    /// Split one text into windows
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let (separator, remaining) = choose_separator(text, separators);
        let splits = split_keeping_separator(text, separator);

        let mut final_chunks = Vec::new();
        let mut good_splits: Vec<&str> = Vec::new();

        for split in splits {
            if char_len(split) < self.chunk_size {
                good_splits.push(split);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                // Unsplittable run: emitted as-is even though it is too long
                final_chunks.push(split.to_string());
            } else {
                final_chunks.extend(self.split_recursive(split, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Greedily pack small pieces into windows of at most `chunk_size` chars
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for split in splits {
            let len = char_len(split);

            if total + len > self.chunk_size && !current.is_empty() {
                if let Some(doc) = join_pieces(&current) {
                    docs.push(doc);
                }

                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    total -= char_len(current[0]);
                    current.remove(0);
                }
            }

            current.push(split);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }

        docs
    }
}

impl Default for RecursiveTextSplitter {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// First separator present in `text`, and the separators ranked below it
fn choose_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() || text.contains(separator.as_str()) {
            return (separator.as_str(), &separators[i + 1..]);
        }
    }

    let last = separators.last().map(String::as_str).unwrap_or("");
    (last, &[])
}

/// Split on `separator`, keeping each separator at the start of the piece
/// that follows it. Empty pieces are dropped.
fn split_keeping_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut boundaries: Vec<usize> = vec![0];
    boundaries.extend(text.match_indices(separator).map(|(i, _)| i));
    boundaries.push(text.len());
    boundaries.dedup();

    boundaries
        .windows(2)
        .map(|w| &text[w[0]..w[1]])
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn join_pieces(pieces: &[&str]) -> Option<String> {
    let joined = pieces.concat();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize) -> RecursiveTextSplitter {
        RecursiveTextSplitter::new(
            size,
            overlap,
            ["\n\n", "\n", ".", " "].iter().map(|s| s.to_string()).collect(),
        )
    }

    fn page(index: u32, content: &str) -> Page {
        Page {
            source: "regulations.pdf".to_string(),
            page: index,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = splitter(800, 100).split_text("Article 1. The faculty grants a bachelor degree.");
        assert_eq!(chunks, vec!["Article 1. The faculty grants a bachelor degree."]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(splitter(800, 100).split_text("").is_empty());
        assert!(splitter(800, 100).split_text("  \n\n  ").is_empty());
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "First paragraph about admission.\n\nSecond paragraph about fees.";
        let chunks = splitter(40, 0).split_text(text);
        assert_eq!(
            chunks,
            vec!["First paragraph about admission.", "Second paragraph about fees."]
        );
    }

    #[test]
    fn test_falls_back_to_words() {
        let chunks = splitter(10, 0).split_text("alpha beta gamma delta");
        assert_eq!(chunks, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn test_no_chunk_exceeds_size() {
        let text = "The student must attend at least seventy five percent of lectures. "
            .repeat(40)
            + "\n\n"
            + &"Exams are held at the end of each semester. ".repeat(30);
        let chunks = splitter(800, 100).split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 800, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let words: Vec<String> = (0..200).map(|i| format!("w{:03}", i)).collect();
        let text = words.join(" ");
        let chunks = splitter(100, 20).split_text(&text);

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let first_word_of_next = pair[1].split(' ').next().unwrap();
            assert!(
                pair[0].contains(first_word_of_next),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_unsplittable_run_is_kept_whole() {
        let run = "x".repeat(50);
        let chunks = splitter(20, 5).split_text(&run);
        assert_eq!(chunks, vec![run]);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // 5 Arabic letters take 10 bytes but fit a 6-char window
        let text = "\u{0628}\u{0627}\u{0628}\u{0627}\u{0628}";
        let chunks = splitter(6, 0).split_text(text);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(
            split_keeping_separator("a.b.c", "."),
            vec!["a", ".b", ".c"]
        );
        assert_eq!(split_keeping_separator(".a", "."), vec![".a"]);
        assert_eq!(split_keeping_separator("abc", " "), vec!["abc"]);
    }

    #[test]
    fn test_split_pages_keeps_page_metadata() {
        let pages = vec![
            page(0, "Admission rules.\n\nTransfer rules."),
            page(1, ""),
            page(2, "Graduation rules."),
        ];
        let chunks = splitter(20, 0).split_pages(&pages);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.iter().map(|c| c.page).collect::<Vec<_>>(), vec![0, 0, 2]);
        assert_eq!(
            chunks.iter().map(|c| c.chunk_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(chunks.iter().all(|c| c.source == "regulations.pdf"));
    }
}
