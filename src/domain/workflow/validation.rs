//! Structural validation of a workflow's component set.
//!
//! Every rule is evaluated; nothing short-circuits. Only the two required
//! node kinds produce errors, everything else is a warning and leaves the
//! workflow executable. There is deliberately no cycle or edge validation:
//! execution resolves components by type lookup, so the `connections` blob
//! carries no semantics.

use serde::{Deserialize, Serialize};

use super::entity::{Component, ComponentConfig};

/// Outcome of validating a component set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

fn is_missing(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.is_empty())
}

/// Validate a workflow's components per the builder's contract
pub fn validate_components(components: &[Component]) -> ValidationReport {
    let mut report = ValidationReport::ok();

    let has_user_query = components
        .iter()
        .any(|c| matches!(c.config, ComponentConfig::UserQuery));
    let has_output = components
        .iter()
        .any(|c| matches!(c.config, ComponentConfig::Output));
    let has_llm = components
        .iter()
        .any(|c| matches!(c.config, ComponentConfig::LlmEngine(_)));

    if !has_user_query {
        report.error("Missing User Query component");
    }

    if !has_output {
        report.error("Missing Output component");
    }

    if !has_llm {
        report.warn("No LLM Engine component found");
    }

    for component in components {
        match &component.config {
            ComponentConfig::LlmEngine(config) => {
                if is_missing(&config.api_key) {
                    report.warn("LLM Engine missing API key");
                }
                if is_missing(&config.model) {
                    report.warn("LLM Engine missing model selection");
                }
            }
            ComponentConfig::KnowledgeBase(config) => {
                if is_missing(&config.embedding_model) {
                    report.warn("Knowledge Base missing embedding model");
                }
            }
            ComponentConfig::UserQuery | ComponentConfig::Output => {}
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::entity::{
        ComponentConfig, KnowledgeBaseConfig, LlmEngineConfig, Position, WorkflowId,
    };

    fn component(config: ComponentConfig) -> Component {
        Component::new(WorkflowId::generate(), config, Position::default())
    }

    fn complete_llm_config() -> ComponentConfig {
        ComponentConfig::LlmEngine(LlmEngineConfig {
            api_key: Some("sk-test".to_string()),
            model: Some("openai".to_string()),
            ..Default::default()
        })
    }

    fn complete_kb_config() -> ComponentConfig {
        ComponentConfig::KnowledgeBase(KnowledgeBaseConfig {
            embedding_model: Some("text-embedding-3-large".to_string()),
            collection_name: None,
        })
    }

    #[test]
    fn test_empty_workflow_is_invalid() {
        let report = validate_components(&[]);
        assert!(!report.valid);
        assert!(report.errors.contains(&"Missing User Query component".to_string()));
        assert!(report.errors.contains(&"Missing Output component".to_string()));
        assert!(report.warnings.contains(&"No LLM Engine component found".to_string()));
    }

    #[test]
    fn test_missing_user_query_is_error_regardless_of_rest() {
        let components = vec![
            component(ComponentConfig::Output),
            component(complete_llm_config()),
            component(complete_kb_config()),
        ];
        let report = validate_components(&components);
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Missing User Query component"]);
    }

    #[test]
    fn test_missing_output_is_error() {
        let components = vec![component(ComponentConfig::UserQuery)];
        let report = validate_components(&components);
        assert!(!report.valid);
        assert!(report.errors.contains(&"Missing Output component".to_string()));
    }

    #[test]
    fn test_complete_workflow_has_no_warnings() {
        let components = vec![
            component(ComponentConfig::UserQuery),
            component(complete_kb_config()),
            component(complete_llm_config()),
            component(ComponentConfig::Output),
        ];
        let report = validate_components(&components);
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_llm_engine_is_warning_only() {
        let components = vec![
            component(ComponentConfig::UserQuery),
            component(ComponentConfig::Output),
        ];
        let report = validate_components(&components);
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["No LLM Engine component found"]);
    }

    #[test]
    fn test_unconfigured_llm_engine_warnings() {
        let components = vec![
            component(ComponentConfig::UserQuery),
            component(ComponentConfig::LlmEngine(LlmEngineConfig::default())),
            component(ComponentConfig::Output),
        ];
        let report = validate_components(&components);
        assert!(report.valid);
        assert!(report.warnings.contains(&"LLM Engine missing API key".to_string()));
        assert!(report.warnings.contains(&"LLM Engine missing model selection".to_string()));
    }

    #[test]
    fn test_empty_string_config_counts_as_missing() {
        let components = vec![
            component(ComponentConfig::UserQuery),
            component(ComponentConfig::KnowledgeBase(KnowledgeBaseConfig {
                embedding_model: Some(String::new()),
                collection_name: None,
            })),
            component(ComponentConfig::Output),
        ];
        let report = validate_components(&components);
        assert!(report.warnings.contains(&"Knowledge Base missing embedding model".to_string()));
    }

    #[test]
    fn test_every_llm_engine_is_checked() {
        let components = vec![
            component(ComponentConfig::UserQuery),
            component(ComponentConfig::LlmEngine(LlmEngineConfig::default())),
            component(ComponentConfig::LlmEngine(LlmEngineConfig::default())),
            component(ComponentConfig::Output),
        ];
        let report = validate_components(&components);
        let api_key_warnings = report
            .warnings
            .iter()
            .filter(|w| w.as_str() == "LLM Engine missing API key")
            .count();
        assert_eq!(api_key_warnings, 2);
    }
}
