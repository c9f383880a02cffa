//! Domain layer: entities, value types, provider traits and validation

pub mod chat;
pub mod document;
pub mod embedding;
mod error;
pub mod llm;
pub mod search;
pub mod storage;
pub mod vector;
pub mod workflow;

pub use error::DomainError;
