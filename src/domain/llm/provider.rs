use std::fmt::Debug;

use async_trait::async_trait;

use super::{Generation, GenerationRequest};
use crate::domain::DomainError;

/// Trait for text generation backends (OpenAI, Gemini)
#[async_trait]
pub trait GenerationProvider: Send + Sync + Debug {
    /// Generate a completion for the given prompt
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// List models known to be available from this provider
    fn available_models(&self) -> Vec<&'static str>;
}
