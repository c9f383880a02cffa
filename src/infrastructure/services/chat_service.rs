//! Chat service - session-scoped conversation wrapper around workflow runs

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::chat::{ChatMessage, MessageType};
use crate::domain::storage::Storage;
use crate::domain::workflow::{ExecutionOutcome, WorkflowId};

use super::WorkflowService;

/// Default number of messages returned by workflow history queries
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Outcome of one chat turn
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub session_id: String,
    /// The persisted reply: an assistant message on success, a system
    /// error notice otherwise
    pub message: ChatMessage,
    pub success: bool,
}

/// Aggregate view of one session
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub message_count: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub total_tokens: u32,
    pub models_used: Vec<String>,
    pub duration_secs: i64,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_activity: Option<chrono::DateTime<chrono::Utc>>,
}

/// Chat service wrapping workflow execution with persistent sessions.
///
/// The user message is persisted before execution, so a failed run still
/// leaves a complete transcript.
pub struct ChatService {
    messages: Arc<dyn Storage<ChatMessage>>,
    workflow_service: Arc<WorkflowService>,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService").finish()
    }
}

impl ChatService {
    pub fn new(
        messages: Arc<dyn Storage<ChatMessage>>,
        workflow_service: Arc<WorkflowService>,
    ) -> Self {
        Self {
            messages,
            workflow_service,
        }
    }

    /// Fresh session identifier
    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Run one chat turn against a workflow
    pub async fn send(
        &self,
        workflow_id: &str,
        query: &str,
        session_id: Option<String>,
    ) -> Result<ChatTurn, DomainError> {
        let workflow_key = WorkflowId::new(workflow_id)?;
        let session_id = session_id.unwrap_or_else(Self::new_session_id);

        let user_message = ChatMessage::new(
            workflow_key.clone(),
            session_id.clone(),
            MessageType::User,
            query,
        );
        self.messages.create(user_message).await?;

        let started = Instant::now();
        let outcome = self.workflow_service.execute(workflow_id, query).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (reply, success) = match outcome {
            ExecutionOutcome::Success(result) => {
                let message = ChatMessage::new(
                    workflow_key,
                    session_id.clone(),
                    MessageType::Assistant,
                    result.response,
                )
                .with_processing_time(elapsed_ms)
                .with_tokens_used(result.usage.total_tokens)
                .with_model_used(result.model);
                (message, true)
            }
            outcome => {
                let error = outcome
                    .error_message()
                    .unwrap_or_else(|| "Unknown error".to_string());
                let message = ChatMessage::new(
                    workflow_key,
                    session_id.clone(),
                    MessageType::System,
                    format!("Error: {}", error),
                )
                .with_processing_time(elapsed_ms);
                (message, false)
            }
        };

        let message = self.messages.create(reply).await?;
        info!(workflow_id, session_id, success, "Chat turn completed");

        Ok(ChatTurn {
            session_id,
            message,
            success,
        })
    }

    /// Most recent messages for a workflow, newest first, optionally
    /// narrowed to one session
    pub async fn history(
        &self,
        workflow_id: &str,
        session_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let workflow_id = WorkflowId::new(workflow_id)?;
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

        let mut messages: Vec<ChatMessage> = self
            .messages
            .list()
            .await?
            .into_iter()
            .filter(|m| m.workflow_id == workflow_id)
            .filter(|m| session_id.is_none_or(|s| m.session_id == s))
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages.truncate(limit);
        Ok(messages)
    }

    /// All messages in a session, oldest first
    pub async fn session_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, DomainError> {
        let mut messages: Vec<ChatMessage> = self
            .messages
            .list()
            .await?
            .into_iter()
            .filter(|m| m.session_id == session_id)
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    /// Aggregate counts, token totals and activity window for a session
    pub async fn session_summary(&self, session_id: &str) -> Result<SessionSummary, DomainError> {
        let messages = self.session_messages(session_id).await?;

        let mut models_used: Vec<String> = Vec::new();
        for model in messages.iter().filter_map(|m| m.model_used.as_deref()) {
            if !models_used.iter().any(|m| m == model) {
                models_used.push(model.to_string());
            }
        }

        let started_at = messages.first().map(|m| m.created_at);
        let last_activity = messages.last().map(|m| m.created_at);
        let duration_secs = match (started_at, last_activity) {
            (Some(start), Some(end)) => (end - start).num_seconds(),
            _ => 0,
        };

        Ok(SessionSummary {
            session_id: session_id.to_string(),
            message_count: messages.len(),
            user_messages: messages
                .iter()
                .filter(|m| m.message_type == MessageType::User)
                .count(),
            assistant_messages: messages
                .iter()
                .filter(|m| m.message_type == MessageType::Assistant)
                .count(),
            total_tokens: messages.iter().filter_map(|m| m.tokens_used).sum(),
            models_used,
            duration_secs,
            started_at,
            last_activity,
        })
    }

    /// Delete every message in a session, returning how many were removed.
    /// The removal goes through one batch call, so on backends with
    /// single-statement deletes a failure leaves the session intact.
    pub async fn delete_session(&self, session_id: &str) -> Result<usize, DomainError> {
        let messages = self.session_messages(session_id).await?;
        let keys: Vec<_> = messages.into_iter().map(|m| m.id).collect();
        let deleted = self.messages.delete_batch(&keys).await?;

        info!(session_id, deleted, "Deleted chat session");
        Ok(deleted)
    }
}
