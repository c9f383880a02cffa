//! SerpAPI web search backend.
//!
//! Search is a best-effort prompt enrichment: a missing API key or any
//! request failure yields an empty hit list, never an error.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::domain::search::{SearchHit, WebSearchProvider};
use crate::infrastructure::http::HttpClientTrait;

const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// Google search via SerpAPI
#[derive(Debug)]
pub struct SerpApiSearchProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
}

impl<C: HttpClientTrait> SerpApiSearchProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchProvider for SerpApiSearchProvider<C> {
    async fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let Some(api_key) = &self.api_key else {
            warn!("Web search requested but no SerpAPI key configured");
            return Vec::new();
        };

        let num = top_k.to_string();
        let query_params = vec![
            ("q", query),
            ("api_key", api_key.as_str()),
            ("num", num.as_str()),
        ];

        let json = match self.client.get_json(SERPAPI_URL, query_params).await {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Web search request failed");
                return Vec::new();
            }
        };

        let response: SerpApiResponse = match serde_json::from_value(json) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to parse web search response");
                return Vec::new();
            }
        };

        response
            .organic_results
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(i, result)| SearchHit {
                title: result.title.unwrap_or_default(),
                snippet: result.snippet.unwrap_or_default(),
                link: result.link.unwrap_or_default(),
                rank: result.position.unwrap_or(i as u32 + 1),
            })
            .collect()
    }

    fn provider_name(&self) -> &'static str {
        "serpapi"
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiOrganicResult>,
}

#[derive(Debug, Deserialize)]
struct SerpApiOrganicResult {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
    position: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::MockHttpClient;

    fn mock_results() -> serde_json::Value {
        serde_json::json!({
            "organic_results": [
                {
                    "position": 1,
                    "title": "Rust Programming Language",
                    "snippet": "A language empowering everyone.",
                    "link": "https://www.rust-lang.org/"
                },
                {
                    "position": 2,
                    "title": "Rust (disambiguation)",
                    "snippet": "Iron oxide.",
                    "link": "https://en.wikipedia.org/wiki/Rust"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_search_parses_organic_results() {
        let client = MockHttpClient::new().with_response(SERPAPI_URL, mock_results());
        let provider = SerpApiSearchProvider::new(client, Some("key".to_string()));

        let hits = provider.search("rust", 5).await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rust Programming Language");
        assert_eq!(hits[0].rank, 1);
        assert_eq!(hits[1].link, "https://en.wikipedia.org/wiki/Rust");
    }

    #[tokio::test]
    async fn test_search_truncates_to_top_k() {
        let client = MockHttpClient::new().with_response(SERPAPI_URL, mock_results());
        let provider = SerpApiSearchProvider::new(client, Some("key".to_string()));

        let hits = provider.search("rust", 1).await;
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_search_without_key_is_empty() {
        let provider = SerpApiSearchProvider::new(MockHttpClient::new(), None);
        assert!(provider.search("rust", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_swallows_request_failure() {
        let client = MockHttpClient::new().with_error(SERPAPI_URL, "timeout");
        let provider = SerpApiSearchProvider::new(client, Some("key".to_string()));
        assert!(provider.search("rust", 5).await.is_empty());
    }
}
