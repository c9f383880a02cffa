//! Chat endpoints wrapping workflow execution in sessions

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::chat::ChatMessage;
use crate::infrastructure::services::{ChatService, SessionSummary};

#[derive(Debug, Deserialize)]
pub struct SendBody {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl From<crate::infrastructure::services::ChatTurn> for SendResponse {
    fn from(turn: crate::infrastructure::services::ChatTurn) -> Self {
        let message = turn.message;
        if turn.success {
            Self {
                success: true,
                session_id: turn.session_id,
                response: Some(message.content),
                error: None,
                model_used: message.model_used,
                tokens_used: message.tokens_used,
                processing_time_ms: message.processing_time_ms,
            }
        } else {
            Self {
                success: false,
                session_id: turn.session_id,
                response: None,
                error: Some(
                    message
                        .content
                        .strip_prefix("Error: ")
                        .unwrap_or(&message.content)
                        .to_string(),
                ),
                model_used: None,
                tokens_used: None,
                processing_time_ms: message.processing_time_ms,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    pub deleted: usize,
}

/// POST /api/v1/chat/{workflow_id}/send
pub async fn send_message(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
    Json(body): Json<SendBody>,
) -> Result<Json<SendResponse>, ApiError> {
    if body.query.trim().is_empty() {
        return Err(ApiError::bad_request("Query cannot be empty"));
    }

    let turn = state
        .chat_service
        .send(&workflow_id, &body.query, body.session_id)
        .await?;

    Ok(Json(SendResponse::from(turn)))
}

/// GET /api/v1/chat/{workflow_id}/history
pub async fn workflow_history(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    Ok(Json(
        state
            .chat_service
            .history(&workflow_id, params.session_id.as_deref(), params.limit)
            .await?,
    ))
}

/// GET /api/v1/chat/sessions/{session_id}
pub async fn session_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    Ok(Json(state.chat_service.session_messages(&session_id).await?))
}

/// GET /api/v1/chat/sessions/{session_id}/summary
pub async fn session_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
    Ok(Json(state.chat_service.session_summary(&session_id).await?))
}

/// DELETE /api/v1/chat/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteSessionResponse>, ApiError> {
    let deleted = state.chat_service.delete_session(&session_id).await?;
    Ok(Json(DeleteSessionResponse { deleted }))
}

/// POST /api/v1/chat/sessions/new
pub async fn new_session() -> (StatusCode, Json<NewSessionResponse>) {
    (
        StatusCode::CREATED,
        Json(NewSessionResponse {
            session_id: ChatService::new_session_id(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_body_without_session() {
        let body: SendBody = serde_json::from_str(r#"{"query": "hello"}"#).unwrap();
        assert_eq!(body.query, "hello");
        assert!(body.session_id.is_none());
    }

    #[test]
    fn test_send_response_failure_strips_error_prefix() {
        use crate::domain::chat::MessageType;
        use crate::domain::workflow::Workflow;
        use crate::infrastructure::services::ChatTurn;

        let workflow = Workflow::new("wf");
        let message = ChatMessage::new(
            workflow.id,
            "session-1".to_string(),
            MessageType::System,
            "Error: Invalid workflow",
        );

        let response = SendResponse::from(ChatTurn {
            session_id: "session-1".to_string(),
            message,
            success: false,
        });

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Invalid workflow"));
        assert!(response.response.is_none());
        assert!(response.model_used.is_none());
    }

    #[tokio::test]
    async fn test_new_session_returns_uuid() {
        let (status, Json(response)) = new_session().await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(uuid::Uuid::parse_str(&response.session_id).is_ok());
    }
}
