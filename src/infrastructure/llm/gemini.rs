//! Google Gemini backend.
//!
//! The generateContent API exposes no usage accounting and no token cap
//! parameter, so usage is approximated as whitespace word counts of prompt
//! and response (`UsageBasis::Approximate`) and `max_tokens` is ignored.
//! These numbers are not comparable with the OpenAI backend's reported
//! counts.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::llm::{Generation, GenerationProvider, GenerationRequest, TokenUsage};
use crate::infrastructure::http::HttpClientTrait;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini API provider
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_GEMINI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        }
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(&self, request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{"parts": [{"text": request.prompt}]}],
            "generationConfig": {"temperature": request.temperature},
        })
    }

    fn parse_response(
        &self,
        json: serde_json::Value,
        prompt: &str,
    ) -> Result<Generation, DomainError> {
        let response: GeminiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("gemini", format!("Failed to parse response: {}", e))
        })?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| DomainError::provider("gemini", "No candidates in response"))?;

        let usage = TokenUsage::approximated(prompt, &text);

        Ok(Generation::new(text, self.model.clone(), usage))
    }
}

#[async_trait]
impl<C: HttpClientTrait> GenerationProvider for GeminiProvider<C> {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, DomainError> {
        let url = self.generate_content_url();
        let body = self.build_request(&request);
        let headers = vec![("Content-Type", "application/json")];
        let response = self.client.post_json(&url, headers, &body).await?;

        self.parse_response(response, &request.prompt)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn available_models(&self) -> Vec<&'static str> {
        vec!["gemini-pro", "gemini-1.5-pro", "gemini-1.5-flash"]
    }
}

// Gemini API types

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
