//! PdfTextExtractor -- concrete [`TextExtractor`] implementation.
//!
//! Extraction runs on the blocking thread pool because `pdf-extract`
//! parses the whole document synchronously. Only `.pdf` files are
//! accepted; the extension check happens before any I/O.

use std::path::Path;

use tracing::debug;

use glimora_core::client::TextExtractor;
use glimora_types::error::ExtractionError;

/// PDF text extractor backed by the `pdf-extract` crate.
#[derive(Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !extension.eq_ignore_ascii_case("pdf") {
            return Err(ExtractionError::UnsupportedFormat(extension));
        }

        let owned = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
            .await
            // A panic in the parser surfaces as a join error.
            .map_err(|e| ExtractionError::Parse(format!("extraction task failed: {e}")))?
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        debug!(file = %path.display(), chars = text.len(), "pdf text extracted");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_pdf_extension() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract(Path::new("notes.txt")).await;
        match result {
            Err(ExtractionError::UnsupportedFormat(ext)) => assert_eq!(ext, "txt"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_missing_extension() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract(Path::new("Makefile")).await;
        assert!(matches!(
            result,
            Err(ExtractionError::UnsupportedFormat(ext)) if ext.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() {
        // Uppercase extension passes the gate; the file itself is garbage,
        // so extraction fails at parse instead.
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("REPORT.PDF");
        tokio::fs::write(&path, b"not a real pdf").await.unwrap();

        let extractor = PdfTextExtractor::new();
        let result = extractor.extract(&path).await;
        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }

    #[tokio::test]
    async fn test_garbage_pdf_fails_parse() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.pdf");
        tokio::fs::write(&path, b"%PDF-1.4 truncated garbage").await.unwrap();

        let extractor = PdfTextExtractor::new();
        let result = extractor.extract(&path).await;
        assert!(result.is_err());
    }
}
