//! Workflow and component domain entities

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::storage::{StorageEntity, StorageKey};

macro_rules! uuid_id {
    ($name:ident, $label:expr) => {
        /// Validated UUID identifier
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, validating the UUID format
            pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
                let id = id.into();
                Uuid::parse_str(&id).map_err(|_| {
                    DomainError::invalid_id(format!("Invalid {} ID '{}'", $label, id))
                })?;
                Ok(Self(id))
            }

            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl StorageKey for $name {
            fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

uuid_id!(WorkflowId, "workflow");
uuid_id!(ComponentId, "component");

/// A user-assembled workflow owning a set of components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    pub description: Option<String>,
    /// Deactivation is a soft delete; the row is retained
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowId::generate(),
            name: name.into(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Bump the update timestamp after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }
}

impl StorageEntity for Workflow {
    type Key = WorkflowId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Canvas position of a component; presentation only, irrelevant to execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The four component kinds a workflow is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    UserQuery,
    KnowledgeBase,
    LlmEngine,
    Output,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserQuery => "user_query",
            Self::KnowledgeBase => "knowledge_base",
            Self::LlmEngine => "llm_engine",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a knowledge-base component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    /// Vector-store collection; defaults to a name derived from the workflow id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

/// Configuration of an LLM engine component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmEngineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Backend choice ("openai" or "gemini"); unrecognized names fall back
    /// to the default backend at execution time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Custom prompt used verbatim, with no context interpolation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub use_web_search: bool,
}

/// Per-kind component configuration, validated at construction.
///
/// The API accepts a `component_type` string plus a free-form JSON object
/// and deserializes it into the matching variant here; probing for optional
/// keys at execution time is thereby avoided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component_type", content = "configuration", rename_all = "snake_case")]
pub enum ComponentConfig {
    UserQuery,
    KnowledgeBase(KnowledgeBaseConfig),
    LlmEngine(LlmEngineConfig),
    Output,
}

impl ComponentConfig {
    /// Build a typed configuration from the wire representation
    pub fn from_parts(
        component_type: &str,
        configuration: serde_json::Value,
    ) -> Result<Self, DomainError> {
        let configuration = if configuration.is_null() {
            serde_json::json!({})
        } else {
            configuration
        };

        match component_type {
            "user_query" => Ok(Self::UserQuery),
            "output" => Ok(Self::Output),
            "knowledge_base" => serde_json::from_value(configuration)
                .map(Self::KnowledgeBase)
                .map_err(|e| {
                    DomainError::validation(format!("Invalid knowledge_base configuration: {}", e))
                }),
            "llm_engine" => serde_json::from_value(configuration)
                .map(Self::LlmEngine)
                .map_err(|e| {
                    DomainError::validation(format!("Invalid llm_engine configuration: {}", e))
                }),
            other => Err(DomainError::validation(format!(
                "Unknown component type '{}'",
                other
            ))),
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::UserQuery => ComponentType::UserQuery,
            Self::KnowledgeBase(_) => ComponentType::KnowledgeBase,
            Self::LlmEngine(_) => ComponentType::LlmEngine,
            Self::Output => ComponentType::Output,
        }
    }

    /// Wire representation of the configuration body
    pub fn configuration_value(&self) -> serde_json::Value {
        match self {
            Self::UserQuery | Self::Output => serde_json::json!({}),
            Self::KnowledgeBase(config) => {
                serde_json::to_value(config).unwrap_or_else(|_| serde_json::json!({}))
            }
            Self::LlmEngine(config) => {
                serde_json::to_value(config).unwrap_or_else(|_| serde_json::json!({}))
            }
        }
    }
}

/// A typed, configurable node belonging to exactly one workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub workflow_id: WorkflowId,
    pub position: Position,
    #[serde(flatten)]
    pub config: ComponentConfig,
    /// Stored for the canvas but never interpreted; execution resolves
    /// components by type lookup, not by following edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<serde_json::Value>,
}

impl Component {
    pub fn new(workflow_id: WorkflowId, config: ComponentConfig, position: Position) -> Self {
        Self {
            id: ComponentId::generate(),
            workflow_id,
            position,
            config,
            connections: None,
        }
    }

    pub fn component_type(&self) -> ComponentType {
        self.config.component_type()
    }
}

impl StorageEntity for Component {
    type Key = ComponentId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
