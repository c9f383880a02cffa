//! Document service - upload, text extraction and lifecycle

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::document::{Document, DocumentId, EmbeddingStatus, TextExtractor};
use crate::domain::storage::Storage;
use crate::domain::workflow::WorkflowId;

/// Default cap on uploaded file size (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// An upload about to be stored
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub original_filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
    pub workflow_id: Option<String>,
}

impl UploadRequest {
    pub fn new(original_filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            original_filename: original_filename.into(),
            content_type: None,
            data,
            workflow_id: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }
}

/// Document service storing uploads on disk and extraction results in storage
pub struct DocumentService {
    documents: Arc<dyn Storage<Document>>,
    extractor: Arc<dyn TextExtractor>,
    uploads_dir: PathBuf,
    max_file_size: u64,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("uploads_dir", &self.uploads_dir)
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

impl DocumentService {
    pub fn new(
        documents: Arc<dyn Storage<Document>>,
        extractor: Arc<dyn TextExtractor>,
        uploads_dir: impl Into<PathBuf>,
        max_file_size: u64,
    ) -> Self {
        Self {
            documents,
            extractor,
            uploads_dir: uploads_dir.into(),
            max_file_size,
        }
    }

    /// Store an upload on disk and create its pending record
    pub async fn upload(&self, request: UploadRequest) -> Result<Document, DomainError> {
        validate_upload(&request, self.max_file_size)?;

        let workflow_id = request
            .workflow_id
            .as_deref()
            .map(WorkflowId::new)
            .transpose()?;

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| {
                DomainError::document(format!("Failed to create uploads directory: {}", e))
            })?;

        // Uploads get a fresh name; the original survives only in the record
        let stored_name = format!("{}.pdf", Uuid::new_v4());
        let file_path = self.uploads_dir.join(&stored_name);

        tokio::fs::write(&file_path, &request.data)
            .await
            .map_err(|e| DomainError::document(format!("Failed to store upload: {}", e)))?;

        let mime_type = request
            .content_type
            .clone()
            .unwrap_or_else(|| guess_mime(&request.original_filename));

        let mut document = Document::new(
            stored_name,
            request.original_filename,
            file_path.to_string_lossy(),
            request.data.len() as u64,
            mime_type,
        );
        if let Some(workflow_id) = workflow_id {
            document = document.with_workflow(workflow_id);
        }

        let document = self.documents.create(document).await?;
        info!(document_id = %document.id, filename = document.original_filename, "Stored upload");
        Ok(document)
    }

    /// Run text extraction for a stored document and record the result
    pub async fn process(&self, id: &str) -> Result<Document, DomainError> {
        let mut document = self.get_required(id).await?;

        document.embedding_status = EmbeddingStatus::Processing;
        document = self.documents.update(document).await?;

        let extractor = Arc::clone(&self.extractor);
        let path = PathBuf::from(&document.file_path);
        let extraction = tokio::task::spawn_blocking(move || extractor.extract(&path))
            .await
            .map_err(|e| DomainError::internal(format!("Extraction task failed: {}", e)))?;

        match extraction {
            Ok(extracted) => {
                document.mark_extracted(extracted.text, extracted.page_count);
            }
            Err(e) => {
                warn!(document_id = id, error = %e, "Text extraction failed");
                document.mark_failed();
            }
        }

        self.documents.update(document).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Document>, DomainError> {
        let document_id = DocumentId::new(id)?;
        self.documents.get(&document_id).await
    }

    pub async fn get_required(&self, id: &str) -> Result<Document, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Document '{}' not found", id)))
    }

    /// All documents, optionally filtered by workflow
    pub async fn list(&self, workflow_id: Option<&str>) -> Result<Vec<Document>, DomainError> {
        let filter = workflow_id.map(WorkflowId::new).transpose()?;

        let mut documents: Vec<Document> = self
            .documents
            .list()
            .await?
            .into_iter()
            .filter(|d| match &filter {
                Some(workflow_id) => d.workflow_id.as_ref() == Some(workflow_id),
                None => true,
            })
            .collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(documents)
    }

    /// Delete a document record and its file. A missing file is not an
    /// error; the record is the source of truth.
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let Some(document) = self.get(id).await? else {
            return Ok(false);
        };

        if let Err(e) = tokio::fs::remove_file(&document.file_path).await {
            warn!(document_id = id, error = %e, "Failed to remove stored file");
        }

        self.documents.delete(&document.id).await
    }
}

fn validate_upload(request: &UploadRequest, max_file_size: u64) -> Result<(), DomainError> {
    if request.data.is_empty() {
        return Err(DomainError::document("Uploaded file is empty"));
    }

    if request.data.len() as u64 > max_file_size {
        return Err(DomainError::document(format!(
            "File exceeds maximum size of {} bytes",
            max_file_size
        )));
    }

    let is_pdf_name = Path::new(&request.original_filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let is_pdf_type = request
        .content_type
        .as_deref()
        .is_none_or(|t| t == "application/pdf");

    if !is_pdf_name || !is_pdf_type {
        return Err(DomainError::document("Only PDF files are supported"));
    }

    Ok(())
}

fn guess_mime(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::MockTextExtractor;
    use crate::domain::storage::MockStorage;

    fn service_with(extractor: MockTextExtractor, dir: &Path) -> DocumentService {
        DocumentService::new(
            Arc::new(MockStorage::<Document>::new()),
            Arc::new(extractor),
            dir,
            DEFAULT_MAX_FILE_SIZE,
        )
    }

    fn pdf_upload() -> UploadRequest {
        UploadRequest::new("report.pdf", b"%PDF-1.4 fake".to_vec())
            .with_content_type("application/pdf")
    }

    #[tokio::test]
    async fn test_upload_stores_file_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(MockTextExtractor::new(), dir.path());

        let document = service.upload(pdf_upload()).await.unwrap();

        assert_eq!(document.original_filename, "report.pdf");
        assert_ne!(document.filename, "report.pdf");
        assert_eq!(document.embedding_status, EmbeddingStatus::Pending);
        assert_eq!(document.file_size, 13);
        assert!(tokio::fs::try_exists(&document.file_path).await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(MockTextExtractor::new(), dir.path());

        let result = service
            .upload(UploadRequest::new("notes.txt", b"hello".to_vec()))
            .await;
        assert!(matches!(result.unwrap_err(), DomainError::Document { .. }));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = DocumentService::new(
            Arc::new(MockStorage::<Document>::new()),
            Arc::new(MockTextExtractor::new()),
            dir.path(),
            4,
        );

        let result = service.upload(pdf_upload()).await;
        assert!(matches!(result.unwrap_err(), DomainError::Document { .. }));
    }

    #[tokio::test]
    async fn test_process_marks_completed_with_text() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(
            MockTextExtractor::new().with_text("Chapter one.", 2),
            dir.path(),
        );

        let document = service.upload(pdf_upload()).await.unwrap();
        let processed = service.process(document.id.as_str()).await.unwrap();

        assert_eq!(processed.embedding_status, EmbeddingStatus::Completed);
        assert_eq!(processed.text_content.as_deref(), Some("Chapter one."));
        assert_eq!(processed.page_count, Some(2));
    }

    #[tokio::test]
    async fn test_process_marks_failed_on_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(
            MockTextExtractor::new().with_error("corrupt file"),
            dir.path(),
        );

        let document = service.upload(pdf_upload()).await.unwrap();
        let processed = service.process(document.id.as_str()).await.unwrap();

        assert_eq!(processed.embedding_status, EmbeddingStatus::Failed);
        assert!(processed.text_content.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(MockTextExtractor::new(), dir.path());

        let document = service.upload(pdf_upload()).await.unwrap();
        assert!(service.delete(document.id.as_str()).await.unwrap());
        assert!(!tokio::fs::try_exists(&document.file_path).await.unwrap());
        assert!(service.get(document.id.as_str()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(MockTextExtractor::new(), dir.path());
        let workflow_id = WorkflowId::generate();

        service
            .upload(pdf_upload().with_workflow_id(workflow_id.as_str()))
            .await
            .unwrap();
        service.upload(pdf_upload()).await.unwrap();

        let all = service.list(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let scoped = service.list(Some(workflow_id.as_str())).await.unwrap();
        assert_eq!(scoped.len(), 1);
    }
}
