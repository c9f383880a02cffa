//! In-memory vector store backed by an embedding provider.
//!
//! Collections live in a process-local map; vectors are computed on upsert
//! and at query time through the injected [`EmbeddingProvider`]. Query
//! failures (including embedding failures) surface as empty result lists,
//! matching the [`VectorStore`] contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::vector::{CollectionInfo, ScoredDocument, VectorDocument, VectorStore};

#[derive(Debug, Clone)]
struct StoredDocument {
    text: String,
    metadata: HashMap<String, serde_json::Value>,
    vector: Vec<f32>,
}

/// In-memory, per-collection nearest-neighbour store
#[derive(Debug)]
pub struct InMemoryVectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    embedding_model: String,
    collections: RwLock<HashMap<String, HashMap<String, StoredDocument>>>,
}

impl InMemoryVectorStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, embedding_model: impl Into<String>) -> Self {
        Self {
            embedder,
            embedding_model: embedding_model.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        let request = EmbeddingRequest::new(self.embedding_model.clone(), texts);
        Ok(self.embedder.embed(request).await?.vectors)
    }
}

/// Cosine distance in [0, 2]; zero-magnitude vectors are maximally distant
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        collection: &str,
        documents: Vec<VectorDocument>,
    ) -> Result<(), DomainError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = self.embed_texts(texts).await?;

        if vectors.len() != documents.len() {
            return Err(DomainError::storage(
                "Embedding count does not match document count",
            ));
        }

        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection.to_string()).or_default();
        for (document, vector) in documents.into_iter().zip(vectors) {
            entries.insert(
                document.id,
                StoredDocument {
                    text: document.text,
                    metadata: document.metadata,
                    vector,
                },
            );
        }

        Ok(())
    }

    async fn query(&self, collection: &str, query: &str, top_k: usize) -> Vec<ScoredDocument> {
        let query_vector = match self.embed_texts(vec![query.to_string()]).await {
            Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!(collection, error = %e, "Query embedding failed, returning no matches");
                return Vec::new();
            }
        };

        let collections = self.collections.read().await;
        let Some(entries) = collections.get(collection) else {
            return Vec::new();
        };

        let mut scored: Vec<ScoredDocument> = entries
            .values()
            .map(|doc| ScoredDocument {
                text: doc.text.clone(),
                metadata: doc.metadata.clone(),
                distance: cosine_distance(&query_vector, &doc.vector),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(top_k);
        scored
    }

    async fn delete_collection(&self, collection: &str) -> Result<bool, DomainError> {
        Ok(self.collections.write().await.remove(collection).is_some())
    }

    async fn collection_info(&self, collection: &str) -> Option<CollectionInfo> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|entries| CollectionInfo {
                name: collection.to_string(),
                document_count: entries.len(),
            })
    }
}
