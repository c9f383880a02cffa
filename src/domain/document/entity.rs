//! Uploaded document entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::workflow::WorkflowId;

/// Validated document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        Uuid::parse_str(&id)
            .map_err(|_| DomainError::invalid_id(format!("Invalid document ID '{}'", id)))?;
        Ok(Self(id))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for DocumentId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Progress of text extraction for a document.
///
/// Kept under its historical name: no embedding is actually computed in
/// this record's lifecycle, only text extraction updates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl EmbeddingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// An uploaded file and its extracted-text record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub file_size: u64,
    pub mime_type: String,
    pub workflow_id: Option<WorkflowId>,
    pub page_count: Option<u32>,
    pub text_content: Option<String>,
    pub embedding_status: EmbeddingStatus,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        filename: impl Into<String>,
        original_filename: impl Into<String>,
        file_path: impl Into<String>,
        file_size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: DocumentId::generate(),
            filename: filename.into(),
            original_filename: original_filename.into(),
            file_path: file_path.into(),
            file_size,
            mime_type: mime_type.into(),
            workflow_id: None,
            page_count: None,
            text_content: None,
            embedding_status: EmbeddingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn with_workflow(mut self, workflow_id: WorkflowId) -> Self {
        self.workflow_id = Some(workflow_id);
        self
    }

    /// Record a successful extraction
    pub fn mark_extracted(&mut self, text: String, page_count: u32) {
        self.text_content = Some(text);
        self.page_count = Some(page_count);
        self.embedding_status = EmbeddingStatus::Completed;
    }

    pub fn mark_failed(&mut self) {
        self.embedding_status = EmbeddingStatus::Failed;
    }
}

impl StorageEntity for Document {
    type Key = DocumentId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_starts_pending() {
        let doc = Document::new("abc.pdf", "report.pdf", "/tmp/abc.pdf", 100, "application/pdf");
        assert_eq!(doc.embedding_status, EmbeddingStatus::Pending);
        assert!(doc.text_content.is_none());
    }

    #[test]
    fn test_mark_extracted() {
        let mut doc =
            Document::new("abc.pdf", "report.pdf", "/tmp/abc.pdf", 100, "application/pdf");
        doc.mark_extracted("hello".to_string(), 3);
        assert_eq!(doc.embedding_status, EmbeddingStatus::Completed);
        assert_eq!(doc.page_count, Some(3));
        assert_eq!(doc.text_content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&EmbeddingStatus::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
    }
}
