//! PDF text extraction via lopdf

use std::path::Path;

use tracing::warn;

use crate::domain::DomainError;
use crate::domain::document::{ExtractedText, TextExtractor};

/// Extracts text page by page with lopdf
#[derive(Debug, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedText, DomainError> {
        let document = lopdf::Document::load(path)
            .map_err(|e| DomainError::document(format!("Failed to open PDF: {}", e)))?;

        let pages = document.get_pages();
        let page_count = pages.len() as u32;

        let mut text = String::new();
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(page_text.trim_end());
                }
                // Pages without a text layer (e.g. scans) are skipped
                Err(e) => warn!(page = page_number, error = %e, "Skipping unextractable page"),
            }
        }

        if text.trim().is_empty() {
            return Err(DomainError::document("No extractable text found in PDF"));
        }

        Ok(ExtractedText { text, page_count })
    }
}
