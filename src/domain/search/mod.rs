//! Web search provider trait

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One organic web search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub rank: u32,
}

/// Trait for web search backends.
///
/// Search is an optional prompt enrichment, so the contract is infallible:
/// an unconfigured or failing backend yields an empty list.
#[async_trait]
pub trait WebSearchProvider: Send + Sync + Debug {
    async fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit>;

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock web search provider with canned hits
    #[derive(Debug, Default)]
    pub struct MockWebSearchProvider {
        hits: Vec<SearchHit>,
        pub queries: Mutex<Vec<String>>,
    }

    impl MockWebSearchProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_hits(mut self, hits: Vec<SearchHit>) -> Self {
            self.hits = hits;
            self
        }

        pub fn seen_queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WebSearchProvider for MockWebSearchProvider {
        async fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
            self.queries.lock().unwrap().push(query.to_string());
            self.hits.iter().take(top_k).cloned().collect()
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
pub use mock::MockWebSearchProvider;
