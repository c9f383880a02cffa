use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// A document to index in a collection
#[derive(Debug, Clone)]
pub struct VectorDocument {
    pub id: String,
    pub text: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A nearest-neighbour match from a query
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub text: String,
    pub metadata: HashMap<String, serde_json::Value>,
    /// Cosine distance; smaller means more similar
    pub distance: f32,
}

/// Summary of one collection
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub name: String,
    pub document_count: usize,
}

/// Trait for the vector store holding each workflow's retrievable documents.
///
/// Retrieval is an optional enrichment: `query` returns an empty list on any
/// internal failure rather than an error, so a broken or empty collection
/// never fails a workflow run.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Index documents into a collection, creating it if needed
    async fn upsert(
        &self,
        collection: &str,
        documents: Vec<VectorDocument>,
    ) -> Result<(), DomainError>;

    /// Nearest neighbours to the query text, ordered by ascending distance.
    /// Empty on any failure.
    async fn query(&self, collection: &str, query: &str, top_k: usize) -> Vec<ScoredDocument>;

    /// Drop a collection, returns true if it existed
    async fn delete_collection(&self, collection: &str) -> Result<bool, DomainError>;

    /// Info about a collection, None if it does not exist
    async fn collection_info(&self, collection: &str) -> Option<CollectionInfo>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock vector store returning canned results per collection
    #[derive(Debug, Default)]
    pub struct MockVectorStore {
        results: Mutex<HashMap<String, Vec<ScoredDocument>>>,
        pub queries: Mutex<Vec<(String, String, usize)>>,
    }

    impl MockVectorStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_results(self, collection: impl Into<String>, results: Vec<ScoredDocument>) -> Self {
            self.results.lock().unwrap().insert(collection.into(), results);
            self
        }

        pub fn seen_queries(&self) -> Vec<(String, String, usize)> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VectorStore for MockVectorStore {
        async fn upsert(
            &self,
            _collection: &str,
            _documents: Vec<VectorDocument>,
        ) -> Result<(), DomainError> {
            Ok(())
        }

        async fn query(&self, collection: &str, query: &str, top_k: usize) -> Vec<ScoredDocument> {
            self.queries
                .lock()
                .unwrap()
                .push((collection.to_string(), query.to_string(), top_k));

            self.results
                .lock()
                .unwrap()
                .get(collection)
                .map(|results| results.iter().take(top_k).cloned().collect())
                .unwrap_or_default()
        }

        async fn delete_collection(&self, collection: &str) -> Result<bool, DomainError> {
            Ok(self.results.lock().unwrap().remove(collection).is_some())
        }

        async fn collection_info(&self, collection: &str) -> Option<CollectionInfo> {
            self.results
                .lock()
                .unwrap()
                .get(collection)
                .map(|results| CollectionInfo {
                    name: collection.to_string(),
                    document_count: results.len(),
                })
        }
    }
}
