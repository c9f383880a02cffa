use std::fmt::Debug;
use std::path::Path;

use crate::domain::DomainError;

/// Text extracted from an uploaded file
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: u32,
}

/// Trait for pulling text out of an uploaded file
pub trait TextExtractor: Send + Sync + Debug {
    fn extract(&self, path: &Path) -> Result<ExtractedText, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Mock extractor returning fixed text or an error
    #[derive(Debug, Default)]
    pub struct MockTextExtractor {
        text: Option<ExtractedText>,
        error: Option<String>,
    }

    impl MockTextExtractor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_text(mut self, text: impl Into<String>, page_count: u32) -> Self {
            self.text = Some(ExtractedText {
                text: text.into(),
                page_count,
            });
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    impl TextExtractor for MockTextExtractor {
        fn extract(&self, _path: &Path) -> Result<ExtractedText, DomainError> {
            if let Some(error) = &self.error {
                return Err(DomainError::document(error.clone()));
            }
            Ok(self.text.clone().unwrap_or(ExtractedText {
                text: "extracted text".to_string(),
                page_count: 1,
            }))
        }
    }
}
