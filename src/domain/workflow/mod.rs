//! Workflow domain: entities, validation, prompt assembly, result types

mod entity;
mod execution;
pub mod prompt;
mod validation;

pub use entity::{
    Component, ComponentConfig, ComponentId, ComponentType, KnowledgeBaseConfig, LlmEngineConfig,
    Position, Workflow, WorkflowId,
};
pub use execution::{ExecutionOutcome, ExecutionResult, FALLBACK_MODEL};
pub use validation::{ValidationReport, validate_components};
