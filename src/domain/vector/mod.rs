//! Vector store trait for knowledge-base retrieval

mod store;

pub use store::{CollectionInfo, ScoredDocument, VectorDocument, VectorStore};

#[cfg(test)]
pub use store::mock::MockVectorStore;
