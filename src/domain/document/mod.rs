//! Uploaded documents and text extraction

mod entity;
mod extractor;

pub use entity::{Document, DocumentId, EmbeddingStatus};
pub use extractor::{ExtractedText, TextExtractor};

#[cfg(test)]
pub use extractor::mock::MockTextExtractor;
