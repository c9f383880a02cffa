//! Infrastructure layer - External service implementations

pub mod document;
pub mod embedding;
pub mod http;
pub mod llm;
pub mod logging;
pub mod search;
pub mod services;
pub mod storage;
pub mod vector;
