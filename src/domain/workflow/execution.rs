//! Execution result shaping

use serde::{Deserialize, Serialize};

use crate::domain::llm::TokenUsage;

/// Sentinel model name for the no-LLM fallback path
pub const FALLBACK_MODEL: &str = "simple";

/// The payload of a successful workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub response: String,
    pub model: String,
    pub usage: TokenUsage,
    /// Whether retrieved context was non-empty; independent of whether a
    /// custom prompt actually referenced it
    pub context_used: bool,
}

/// Outcome of one workflow run.
///
/// Validation failures and provider failures are ordinary outcomes here,
/// not transport errors: the chat wrapper persists a message either way.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    Success(ExecutionResult),
    /// The workflow failed structural validation; nothing was executed
    Invalid { validation_errors: Vec<String> },
    /// A generation backend failed; no partial result exists
    Failed { error: String },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Human-readable error for the failure outcomes
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::Invalid { .. } => Some("Invalid workflow".to_string()),
            Self::Failed { error } => Some(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_outcome_error_message() {
        let outcome = ExecutionOutcome::Invalid {
            validation_errors: vec!["Missing Output component".to_string()],
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.error_message().as_deref(), Some("Invalid workflow"));
    }

    #[test]
    fn test_failed_outcome_carries_provider_error() {
        let outcome = ExecutionOutcome::Failed {
            error: "Provider error: openai - HTTP 500".to_string(),
        };
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("Provider error: openai - HTTP 500")
        );
    }
}
