//! Storage entity traits

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

/// Trait for types usable as storage keys
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for backends that require string keys
    fn as_str(&self) -> &str;
}

/// Trait for types that can be persisted
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this entity
    type Key: StorageKey;

    /// Returns the entity's key
    fn key(&self) -> &Self::Key;
}

impl StorageKey for String {
    fn as_str(&self) -> &str {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl StorageEntity for Note {
        type Key = String;

        fn key(&self) -> &Self::Key {
            &self.id
        }
    }

    #[test]
    fn test_string_key() {
        let key = "note-1".to_string();
        assert_eq!(key.as_str(), "note-1");
    }

    #[test]
    fn test_entity_key() {
        let note = Note {
            id: "note-1".to_string(),
            body: "hello".to_string(),
        };
        assert_eq!(note.key().as_str(), "note-1");
    }
}
