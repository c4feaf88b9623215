//! PDF loading

use lopdf::Document;
use std::path::Path;

use regdoc_core::{Error, Page, Result};

/// Loads a PDF into one [`Page`] per document page
pub struct PdfLoader;

impl PdfLoader {
    /// Read every page of the PDF at `path`
    ///
    /// A missing file is reported as an IO `NotFound` error. Pages whose text
    /// cannot be extracted are kept with empty content so the page count
    /// always matches the document.
    pub fn load(path: &Path) -> Result<Vec<Page>> {
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("PDF not found: {}", path.display()),
            )));
        }

        let doc = Document::load(path).map_err(|e| {
            Error::DocumentLoader(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let source = path.display().to_string();
        let mut pages = Vec::new();

        for (index, (page_number, _page_id)) in doc.get_pages().into_iter().enumerate() {
            let content = match doc.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to extract text from page {}: {}", page_number, e);
                    String::new()
                }
            };

            pages.push(Page {
                source: source.clone(),
                page: index as u32,
                content,
            });
        }

        tracing::info!("Loaded {} pages from {}", pages.len(), source);
        Ok(pages)
    }

    /// [`PdfLoader::load`] on the blocking thread pool
    pub async fn load_async(path: &Path) -> Result<Vec<Page>> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::load(&path))
            .await
            .map_err(|e| Error::Other(format!("PDF loading task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_pdf;

    #[test]
    fn test_load_produces_one_page_per_pdf_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regulations.pdf");
        write_pdf(
            &path,
            &[
                "Admission requires a secondary school certificate",
                "Tuition fees are paid each semester",
                "Graduation requires completing all credit hours",
            ],
        );

        let pages = PdfLoader::load(&path).unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages.iter().map(|p| p.page).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(pages.iter().all(|p| p.source == path.display().to_string()));
        assert!(pages[1].content.contains("Tuition"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = PdfLoader::load(Path::new("/nonexistent/regulations.pdf")).unwrap_err();
        match err {
            Error::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_garbage_file_is_loader_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        assert!(matches!(PdfLoader::load(&path), Err(Error::DocumentLoader(_))));
    }

    #[tokio::test]
    async fn test_load_async() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.pdf");
        write_pdf(&path, &["Single page"]);

        let pages = PdfLoader::load_async(&path).await.unwrap();
        assert_eq!(pages.len(), 1);
    }
}
