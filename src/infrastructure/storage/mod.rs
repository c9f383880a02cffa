//! Storage backend implementations

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStorage;
pub use postgres::{PostgresConfig, PostgresStorage};
