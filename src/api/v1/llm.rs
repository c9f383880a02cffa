//! Direct generation endpoints, bypassing workflows

use std::collections::HashMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::llm::{Generation, GenerationRequest};
use crate::domain::search::SearchHit;
use crate::domain::workflow::prompt;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateWithContextBody {
    pub query: String,
    pub context: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct WebSearchBody {
    pub query: String,
    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

fn default_num_results() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct WebSearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// POST /api/v1/llm/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<Generation>, ApiError> {
    let provider = state.router.resolve(body.model.as_deref().unwrap_or_default())?;

    let mut request = GenerationRequest::new(body.prompt);
    if let Some(temperature) = body.temperature {
        request = request.with_temperature(temperature);
    }
    if let Some(max_tokens) = body.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }

    Ok(Json(provider.generate(request).await?))
}

/// POST /api/v1/llm/generate-with-context
///
/// Wraps the query and caller-supplied context in the same prompt shape
/// workflow execution uses.
pub async fn generate_with_context(
    State(state): State<AppState>,
    Json(body): Json<GenerateWithContextBody>,
) -> Result<Json<Generation>, ApiError> {
    let provider = state.router.resolve(body.model.as_deref().unwrap_or_default())?;

    let built = prompt::build_prompt(&body.query, &body.context, None, false);
    let mut request = GenerationRequest::new(built);
    if let Some(temperature) = body.temperature {
        request = request.with_temperature(temperature);
    }

    Ok(Json(provider.generate(request).await?))
}

/// POST /api/v1/llm/web-search
pub async fn web_search(
    State(state): State<AppState>,
    Json(body): Json<WebSearchBody>,
) -> Result<Json<WebSearchResponse>, ApiError> {
    let results = state
        .web_search
        .search(&body.query, body.num_results)
        .await;
    Ok(Json(WebSearchResponse {
        query: body.query,
        results,
    }))
}

/// GET /api/v1/llm/models
pub async fn list_models(
    State(state): State<AppState>,
) -> Json<HashMap<String, Vec<String>>> {
    Json(state.router.available_models())
}
