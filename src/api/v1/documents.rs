//! Document upload and extraction endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::document::Document;
use crate::infrastructure::services::UploadRequest;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub workflow_id: Option<String>,
}

/// POST /api/v1/documents/upload
///
/// Multipart form with a `file` part; an optional `workflow_id` part
/// associates the document with a workflow.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut workflow_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::bad_request("File part is missing a filename"))?;
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;

                upload = Some((filename, content_type, data.to_vec()));
            }
            Some("workflow_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid workflow_id: {}", e)))?;
                workflow_id = Some(value);
            }
            _ => {}
        }
    }

    let Some((filename, content_type, data)) = upload else {
        return Err(ApiError::bad_request("Missing 'file' part"));
    };

    let mut request = UploadRequest::new(filename, data);
    if let Some(content_type) = content_type {
        request = request.with_content_type(content_type);
    }
    if let Some(workflow_id) = workflow_id {
        request = request.with_workflow_id(workflow_id);
    }

    let document = state.document_service.upload(request).await?;
    Ok((StatusCode::CREATED, Json(document)).into_response())
}

/// GET /api/v1/documents
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(
        state
            .document_service
            .list(params.workflow_id.as_deref())
            .await?,
    ))
}

/// GET /api/v1/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.document_service.get_required(&id).await?))
}

/// POST /api/v1/documents/{id}/process
pub async fn process_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.document_service.process(&id).await?))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.document_service.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Document '{}' not found", id)))
    }
}
