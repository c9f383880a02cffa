//! Workflow CRUD, validation and execution endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::llm::TokenUsage;
use crate::domain::workflow::{
    Component, ExecutionOutcome, Position, ValidationReport, Workflow,
};
use crate::infrastructure::services::{
    AddComponentRequest, CreateWorkflowRequest, UpdateComponentRequest, UpdateWorkflowRequest,
};

#[derive(Debug, Deserialize)]
pub struct CreateWorkflowBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkflowBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddComponentBody {
    pub component_type: String,
    #[serde(default)]
    pub configuration: serde_json::Value,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub connections: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateComponentBody {
    #[serde(default)]
    pub configuration: Option<serde_json::Value>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub connections: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct WorkflowDetail {
    #[serde(flatten)]
    pub workflow: Workflow,
    pub components: Vec<Component>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    pub query: String,
}

/// Wire shape of one workflow run
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl From<ExecutionOutcome> for ExecuteResponse {
    fn from(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Success(result) => Self {
                success: true,
                response: Some(result.response),
                model: Some(result.model),
                usage: Some(result.usage),
                context_used: Some(result.context_used),
                error: None,
                validation_errors: None,
            },
            ExecutionOutcome::Invalid { validation_errors } => Self {
                success: false,
                response: None,
                model: None,
                usage: None,
                context_used: None,
                error: Some("Invalid workflow".to_string()),
                validation_errors: Some(validation_errors),
            },
            ExecutionOutcome::Failed { error } => Self {
                success: false,
                response: None,
                model: None,
                usage: None,
                context_used: None,
                error: Some(error),
                validation_errors: None,
            },
        }
    }
}

/// POST /api/v1/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(body): Json<CreateWorkflowBody>,
) -> Result<Response, ApiError> {
    let mut request = CreateWorkflowRequest::new(body.name);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }

    let workflow = state.workflow_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(workflow)).into_response())
}

/// GET /api/v1/workflows
pub async fn list_workflows(
    State(state): State<AppState>,
) -> Result<Json<Vec<Workflow>>, ApiError> {
    Ok(Json(state.workflow_service.list().await?))
}

/// GET /api/v1/workflows/{id}
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDetail>, ApiError> {
    let workflow = state.workflow_service.get_required(&id).await?;
    let components = state.workflow_service.components(&id).await?;

    Ok(Json(WorkflowDetail {
        workflow,
        components,
    }))
}

/// PUT /api/v1/workflows/{id}
pub async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateWorkflowBody>,
) -> Result<Json<Workflow>, ApiError> {
    let mut request = UpdateWorkflowRequest::new();
    if let Some(name) = body.name {
        request = request.with_name(name);
    }
    if let Some(description) = body.description {
        request = request.with_description(Some(description));
    }

    Ok(Json(state.workflow_service.update(&id, request).await?))
}

/// DELETE /api/v1/workflows/{id}
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.workflow_service.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Workflow '{}' not found", id)))
    }
}

/// POST /api/v1/workflows/{id}/components
pub async fn add_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AddComponentBody>,
) -> Result<Response, ApiError> {
    let mut request = AddComponentRequest::new(body.component_type)
        .with_configuration(body.configuration)
        .with_position(body.position);
    if let Some(connections) = body.connections {
        request = request.with_connections(connections);
    }

    let component = state.workflow_service.add_component(&id, request).await?;
    Ok((StatusCode::CREATED, Json(component)).into_response())
}

/// PUT /api/v1/workflows/components/{component_id}
pub async fn update_component(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
    Json(body): Json<UpdateComponentBody>,
) -> Result<Json<Component>, ApiError> {
    let mut request = UpdateComponentRequest::new();
    if let Some(configuration) = body.configuration {
        request = request.with_configuration(configuration);
    }
    if let Some(position) = body.position {
        request = request.with_position(position);
    }
    if let Some(connections) = body.connections {
        request = request.with_connections(connections);
    }

    Ok(Json(
        state
            .workflow_service
            .update_component(&component_id, request)
            .await?,
    ))
}

/// GET /api/v1/workflows/{id}/validate
pub async fn validate_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ValidationReport>, ApiError> {
    Ok(Json(state.workflow_service.validate(&id).await?))
}

/// POST /api/v1/workflows/{id}/execute
///
/// Invalid workflows and failed runs come back as 400 with the same
/// response shape, so clients always get the outcome envelope.
pub async fn execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ExecuteBody>,
) -> Result<Response, ApiError> {
    debug!(workflow_id = %id, "Executing workflow");

    let outcome = state.workflow_service.execute(&id, &body.query).await?;
    let response = ExecuteResponse::from(outcome);
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    Ok((status, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::ExecutionResult;

    #[test]
    fn test_execute_response_success_shape() {
        let outcome = ExecutionOutcome::Success(ExecutionResult {
            response: "Paris.".to_string(),
            model: "gpt-4o-mini".to_string(),
            usage: TokenUsage::reported(10, 2),
            context_used: true,
        });

        let json = serde_json::to_value(ExecuteResponse::from(outcome)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["response"], "Paris.");
        assert_eq!(json["usage"]["basis"], "reported");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_execute_response_invalid_shape() {
        let outcome = ExecutionOutcome::Invalid {
            validation_errors: vec!["Missing Output component".to_string()],
        };

        let json = serde_json::to_value(ExecuteResponse::from(outcome)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid workflow");
        assert_eq!(json["validation_errors"][0], "Missing Output component");
        assert!(json.get("response").is_none());
    }

    #[test]
    fn test_execute_response_failed_shape() {
        let outcome = ExecutionOutcome::Failed {
            error: "Provider error: openai - HTTP 500".to_string(),
        };

        let json = serde_json::to_value(ExecuteResponse::from(outcome)).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("validation_errors").is_none());
    }

    #[test]
    fn test_usage_basis_distinguishes_backends() {
        let reported = serde_json::to_value(TokenUsage::reported(5, 5)).unwrap();
        let approximate =
            serde_json::to_value(TokenUsage::approximated("one two", "three")).unwrap();
        assert_eq!(reported["basis"], "reported");
        assert_eq!(approximate["basis"], "approximate");
        assert_eq!(
            approximate["total_tokens"], 3,
            "word counts, not token counts"
        );
    }
}
