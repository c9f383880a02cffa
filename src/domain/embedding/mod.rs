//! Embedding provider trait and request/response types

mod provider;

pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
