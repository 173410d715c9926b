//! PDF text extraction collaborator.
//!
//! Extraction is best-effort: a PDF that cannot be parsed (or makes the parser
//! panic) yields empty text and the upload carries on with default scores.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Plain text of the document, or an empty string if nothing could be read.
    async fn extract(&self, document: Bytes) -> String;
}

/// `pdf-extract` backed extractor. Parsing is CPU-bound and runs on the blocking pool.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Bytes) -> String {
        let size = document.len();
        let result =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&document))
                .await;

        match result {
            Ok(Ok(text)) => {
                debug!("Extracted {} chars from {size} byte PDF", text.len());
                text
            }
            Ok(Err(e)) => {
                warn!("PDF text extraction failed, scoring with defaults: {e}");
                String::new()
            }
            Err(e) => {
                warn!("PDF text extraction aborted, scoring with defaults: {e}");
                String::new()
            }
        }
    }
}
