//! Generic persistence trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::{StorageEntity, StorageKey};

/// CRUD seam every service persists through.
///
/// `create` rejects duplicate keys with `Conflict`; `update` rejects
/// missing keys with `NotFound`. `exists` and `count` have default
/// implementations in terms of `get`/`list` so backends only override
/// them when they can do better.
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    async fn list(&self) -> Result<Vec<E>, DomainError>;

    async fn create(&self, entity: E) -> Result<E, DomainError>;

    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Returns true when something was actually removed
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    /// Removes every listed key, returning how many existed.
    ///
    /// The default loops over `delete`, which can stop partway through on
    /// a backend failure. Backends that can remove the whole set in one
    /// statement override this so a failure removes nothing.
    async fn delete_batch(&self, keys: &[E::Key]) -> Result<usize, DomainError> {
        let mut deleted = 0;
        for key in keys {
            if self.delete(key).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock storage for testing with optional error injection
    #[derive(Debug)]
    pub struct MockStorage<E>
    where
        E: StorageEntity,
    {
        entities: Mutex<HashMap<String, E>>,
        fail_with: Mutex<Option<String>>,
    }

    impl<E> MockStorage<E>
    where
        E: StorageEntity,
    {
        pub fn new() -> Self {
            Self {
                entities: Mutex::new(HashMap::new()),
                fail_with: Mutex::new(None),
            }
        }

        pub fn with_entities(entities: Vec<E>) -> Self {
            let map = entities
                .into_iter()
                .map(|e| (e.key().as_str().to_string(), e))
                .collect();

            Self {
                entities: Mutex::new(map),
                fail_with: Mutex::new(None),
            }
        }

        /// Makes every subsequent operation fail with a storage error
        pub fn fail_with(&self, message: impl Into<String>) {
            *self.fail_with.lock().unwrap() = Some(message.into());
        }

        fn check_failure(&self) -> Result<(), DomainError> {
            if let Some(message) = self.fail_with.lock().unwrap().as_ref() {
                return Err(DomainError::storage(message.clone()));
            }
            Ok(())
        }
    }

    impl<E> Default for MockStorage<E>
    where
        E: StorageEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl<E> Storage<E> for MockStorage<E>
    where
        E: StorageEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            self.check_failure()?;
            Ok(self.entities.lock().unwrap().get(key.as_str()).cloned())
        }

        async fn list(&self) -> Result<Vec<E>, DomainError> {
            self.check_failure()?;
            Ok(self.entities.lock().unwrap().values().cloned().collect())
        }

        async fn create(&self, entity: E) -> Result<E, DomainError> {
            self.check_failure()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();
            if entities.contains_key(&key) {
                return Err(DomainError::conflict(format!(
                    "Entity with key '{}' already exists",
                    key
                )));
            }
            entities.insert(key, entity.clone());
            Ok(entity)
        }

        async fn update(&self, entity: E) -> Result<E, DomainError> {
            self.check_failure()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();
            if !entities.contains_key(&key) {
                return Err(DomainError::not_found(format!(
                    "Entity with key '{}' not found",
                    key
                )));
            }
            entities.insert(key, entity.clone());
            Ok(entity)
        }

        async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
            self.check_failure()?;
            Ok(self.entities.lock().unwrap().remove(key.as_str()).is_some())
        }
    }
}
