//! Chat messages and sessions

mod entity;

pub use entity::{ChatMessage, MessageId, MessageType};
