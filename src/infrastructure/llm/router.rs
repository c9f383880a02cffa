//! Backend selection for generation requests.
//!
//! A workflow's `model` setting is a backend choice, not a model name:
//! a case-insensitive "gemini" selects the Gemini backend when configured,
//! everything else (including unrecognized names) falls through to the
//! default OpenAI backend. An unmatched choice is a graceful default, not
//! an error.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::DomainError;
use crate::domain::llm::GenerationProvider;

/// Routes generation requests to one of the configured backends
#[derive(Debug, Default)]
pub struct GenerationRouter {
    openai: Option<Arc<dyn GenerationProvider>>,
    gemini: Option<Arc<dyn GenerationProvider>>,
}

impl GenerationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openai(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.openai = Some(provider);
        self
    }

    pub fn with_gemini(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.gemini = Some(provider);
        self
    }

    /// Resolve the backend for a model choice string
    pub fn resolve(&self, model_choice: &str) -> Result<Arc<dyn GenerationProvider>, DomainError> {
        if model_choice.eq_ignore_ascii_case("gemini")
            && let Some(gemini) = &self.gemini
        {
            return Ok(Arc::clone(gemini));
        }

        self.openai
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| DomainError::provider("llm", "No LLM provider configured"))
    }

    /// Models known per configured backend, for the models listing endpoint
    pub fn available_models(&self) -> HashMap<String, Vec<String>> {
        let mut models = HashMap::new();
        models.insert("openai".to_string(), provider_models(&self.openai));
        models.insert("gemini".to_string(), provider_models(&self.gemini));
        models
    }
}

fn provider_models(provider: &Option<Arc<dyn GenerationProvider>>) -> Vec<String> {
    provider
        .as_ref()
        .map(|p| p.available_models().iter().map(|m| m.to_string()).collect())
        .unwrap_or_default()
}
