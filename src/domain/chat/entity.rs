//! Chat message entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::workflow::WorkflowId;

/// Validated chat message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        Uuid::parse_str(&id)
            .map_err(|_| DomainError::invalid_id(format!("Invalid message ID '{}'", id)))?;
        Ok(Self(id))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for MessageId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Assistant,
    /// Error notices produced by the service itself
    System,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// One turn in a chat session. Append-only; never updated.
///
/// Messages in a session are ordered by `created_at`; there is no sequence
/// number, so equal timestamps have no defined order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub workflow_id: WorkflowId,
    /// Grouping key for a conversation; a plain string, not an entity
    pub session_id: String,
    pub message_type: MessageType,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: Option<u64>,
    pub tokens_used: Option<u32>,
    pub model_used: Option<String>,
}

impl ChatMessage {
    pub fn new(
        workflow_id: WorkflowId,
        session_id: impl Into<String>,
        message_type: MessageType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            workflow_id,
            session_id: session_id.into(),
            message_type,
            content: content.into(),
            created_at: Utc::now(),
            processing_time_ms: None,
            tokens_used: None,
            model_used: None,
        }
    }

    pub fn with_processing_time(mut self, millis: u64) -> Self {
        self.processing_time_ms = Some(millis);
        self
    }

    pub fn with_tokens_used(mut self, tokens: u32) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    pub fn with_model_used(mut self, model: impl Into<String>) -> Self {
        self.model_used = Some(model.into());
        self
    }
}

impl StorageEntity for ChatMessage {
    type Key = MessageId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_builder() {
        let message = ChatMessage::new(
            WorkflowId::generate(),
            "session-1",
            MessageType::Assistant,
            "Paris.",
        )
        .with_processing_time(120)
        .with_tokens_used(18)
        .with_model_used("gpt-4o-mini");

        assert_eq!(message.message_type, MessageType::Assistant);
        assert_eq!(message.processing_time_ms, Some(120));
        assert_eq!(message.tokens_used, Some(18));
        assert_eq!(message.model_used.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_message_type_serialization() {
        assert_eq!(serde_json::to_string(&MessageType::System).unwrap(), "\"system\"");
    }
}
