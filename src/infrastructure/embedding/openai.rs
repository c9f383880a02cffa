//! OpenAI embeddings backend

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::infrastructure::http::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI embeddings API provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let body = serde_json::json!({
            "model": request.model(),
            "input": request.inputs(),
        });
        let headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let json = self
            .client
            .post_json(&self.embeddings_url(), headers, &body)
            .await?;

        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        // The API does not guarantee input order, so sort by index
        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        Ok(EmbeddingResponse {
            model: request.model().to_string(),
            vectors: data.into_iter().map(|d| d.embedding).collect(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &'static str {
        "text-embedding-3-large"
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    #[tokio::test]
    async fn test_embed_preserves_input_order() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({
                "data": [
                    {"index": 1, "embedding": [0.4, 0.5]},
                    {"index": 0, "embedding": [0.1, 0.2]},
                ],
                "model": "text-embedding-3-large"
            }),
        );
        let provider = OpenAiEmbeddingProvider::new(client, "test-key");

        let response = provider
            .embed(EmbeddingRequest::new(
                "text-embedding-3-large",
                vec!["first".to_string(), "second".to_string()],
            ))
            .await
            .unwrap();

        assert_eq!(response.vectors, vec![vec![0.1, 0.2], vec![0.4, 0.5]]);
    }

    #[tokio::test]
    async fn test_embed_error_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "rate limited");
        let provider = OpenAiEmbeddingProvider::new(client, "test-key");

        let result = provider
            .embed(EmbeddingRequest::new("text-embedding-3-large", vec!["x".to_string()]))
            .await;
        assert!(result.is_err());
    }
}
