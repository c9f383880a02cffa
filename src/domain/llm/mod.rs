//! Text generation domain models and traits

mod provider;
mod request;
mod response;

pub use provider::GenerationProvider;
pub use request::{DEFAULT_TEMPERATURE, GenerationRequest};
pub use response::{Generation, TokenUsage, UsageBasis, word_count};

#[cfg(test)]
pub use provider::mock::MockGenerationProvider;
