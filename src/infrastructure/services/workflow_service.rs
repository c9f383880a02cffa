//! Workflow service - CRUD, validation and execution

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::DomainError;
use crate::domain::llm::{DEFAULT_TEMPERATURE, GenerationRequest, TokenUsage};
use crate::domain::search::WebSearchProvider;
use crate::domain::storage::Storage;
use crate::domain::vector::VectorStore;
use crate::domain::workflow::{
    Component, ComponentConfig, ComponentId, ExecutionOutcome, ExecutionResult, FALLBACK_MODEL,
    KnowledgeBaseConfig, LlmEngineConfig, Position, ValidationReport, Workflow, WorkflowId,
    prompt, validate_components,
};
use crate::infrastructure::llm::GenerationRouter;

/// Nearest neighbours pulled from the knowledge base per run
const RETRIEVAL_TOP_K: usize = 3;
/// Hits requested from the web search backend per run
const WEB_SEARCH_FETCH: usize = 5;
/// Hits actually spliced into the prompt
const WEB_SEARCH_KEEP: usize = 3;

/// Request to create a new workflow
#[derive(Debug, Clone)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CreateWorkflowRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request to update an existing workflow
#[derive(Debug, Clone, Default)]
pub struct UpdateWorkflowRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl UpdateWorkflowRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }
}

/// Request to add a component to a workflow
#[derive(Debug, Clone)]
pub struct AddComponentRequest {
    pub component_type: String,
    pub configuration: serde_json::Value,
    pub position: Position,
    pub connections: Option<serde_json::Value>,
}

impl AddComponentRequest {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            configuration: serde_json::Value::Null,
            position: Position::default(),
            connections: None,
        }
    }

    pub fn with_configuration(mut self, configuration: serde_json::Value) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_connections(mut self, connections: serde_json::Value) -> Self {
        self.connections = Some(connections);
        self
    }
}

/// Request to update an existing component; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateComponentRequest {
    pub configuration: Option<serde_json::Value>,
    pub position: Option<Position>,
    pub connections: Option<serde_json::Value>,
}

impl UpdateComponentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configuration(mut self, configuration: serde_json::Value) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_connections(mut self, connections: serde_json::Value) -> Self {
        self.connections = Some(connections);
        self
    }
}

/// Workflow service for CRUD, validation and sequential execution
pub struct WorkflowService {
    workflows: Arc<dyn Storage<Workflow>>,
    components: Arc<dyn Storage<Component>>,
    router: Arc<GenerationRouter>,
    vector_store: Arc<dyn VectorStore>,
    web_search: Arc<dyn WebSearchProvider>,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService").finish()
    }
}

impl WorkflowService {
    pub fn new(
        workflows: Arc<dyn Storage<Workflow>>,
        components: Arc<dyn Storage<Component>>,
        router: Arc<GenerationRouter>,
        vector_store: Arc<dyn VectorStore>,
        web_search: Arc<dyn WebSearchProvider>,
    ) -> Self {
        Self {
            workflows,
            components,
            router,
            vector_store,
            web_search,
        }
    }

    /// Get a workflow by ID
    pub async fn get(&self, id: &str) -> Result<Option<Workflow>, DomainError> {
        let workflow_id = WorkflowId::new(id)?;
        self.workflows.get(&workflow_id).await
    }

    /// Get a workflow by ID, erroring when absent
    pub async fn get_required(&self, id: &str) -> Result<Workflow, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Workflow '{}' not found", id)))
    }

    /// List active workflows; deactivated ones are hidden
    pub async fn list(&self) -> Result<Vec<Workflow>, DomainError> {
        let mut workflows: Vec<Workflow> = self
            .workflows
            .list()
            .await?
            .into_iter()
            .filter(|w| w.is_active)
            .collect();
        workflows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(workflows)
    }

    /// Create a new workflow
    pub async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError> {
        if request.name.trim().is_empty() {
            return Err(DomainError::validation("Workflow name cannot be empty"));
        }

        let mut workflow = Workflow::new(request.name);
        if let Some(description) = request.description {
            workflow = workflow.with_description(description);
        }

        let workflow = self.workflows.create(workflow).await?;
        info!(workflow_id = %workflow.id, "Created workflow");
        Ok(workflow)
    }

    /// Update an existing workflow
    pub async fn update(
        &self,
        id: &str,
        request: UpdateWorkflowRequest,
    ) -> Result<Workflow, DomainError> {
        let mut workflow = self.get_required(id).await?;

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Workflow name cannot be empty"));
            }
            workflow.name = name;
        }

        if let Some(description) = request.description {
            workflow.description = description;
        }

        workflow.touch();
        self.workflows.update(workflow).await
    }

    /// Soft-delete a workflow; its components and messages are retained
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let Some(mut workflow) = self.get(id).await? else {
            return Ok(false);
        };

        if !workflow.is_active {
            return Ok(false);
        }

        workflow.deactivate();
        self.workflows.update(workflow).await?;
        info!(workflow_id = id, "Deactivated workflow");
        Ok(true)
    }

    /// Add a component to a workflow
    pub async fn add_component(
        &self,
        workflow_id: &str,
        request: AddComponentRequest,
    ) -> Result<Component, DomainError> {
        let workflow = self.get_required(workflow_id).await?;

        let config = ComponentConfig::from_parts(&request.component_type, request.configuration)?;
        let mut component = Component::new(workflow.id, config, request.position);
        component.connections = request.connections;

        self.components.create(component).await
    }

    /// Update an existing component
    pub async fn update_component(
        &self,
        component_id: &str,
        request: UpdateComponentRequest,
    ) -> Result<Component, DomainError> {
        let component_id = ComponentId::new(component_id)?;
        let mut component = self
            .components
            .get(&component_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Component '{}' not found", component_id))
            })?;

        if let Some(configuration) = request.configuration {
            // The component keeps its type; only the configuration body changes
            component.config = ComponentConfig::from_parts(
                component.component_type().as_str(),
                configuration,
            )?;
        }

        if let Some(position) = request.position {
            component.position = position;
        }

        if let Some(connections) = request.connections {
            component.connections = Some(connections);
        }

        self.components.update(component).await
    }

    /// All components belonging to a workflow
    pub async fn components(&self, workflow_id: &str) -> Result<Vec<Component>, DomainError> {
        let workflow_id = WorkflowId::new(workflow_id)?;
        Ok(self
            .components
            .list()
            .await?
            .into_iter()
            .filter(|c| c.workflow_id == workflow_id)
            .collect())
    }

    /// Validate a workflow's component set
    pub async fn validate(&self, workflow_id: &str) -> Result<ValidationReport, DomainError> {
        let components = self.components(workflow_id).await?;
        Ok(validate_components(&components))
    }

    /// Run a workflow against a query.
    ///
    /// An unknown workflow ID is not an error here: it simply has no
    /// components, so the run fails validation like any other incomplete
    /// workflow. Validation and backend failures come back as outcomes, not
    /// `Err`; the error channel is reserved for malformed IDs and storage
    /// faults.
    pub async fn execute(
        &self,
        workflow_id: &str,
        query: &str,
    ) -> Result<ExecutionOutcome, DomainError> {
        let components = self.components(workflow_id).await?;

        let report = validate_components(&components);
        if !report.valid {
            return Ok(ExecutionOutcome::Invalid {
                validation_errors: report.errors,
            });
        }

        let context = self.retrieve_context(workflow_id, query, &components).await;
        let context_used = !context.is_empty();

        let Some(engine) = first_llm_engine(&components) else {
            // No engine configured: echo the query instead of generating
            return Ok(ExecutionOutcome::Success(ExecutionResult {
                response: format!("Query received: {}", query),
                model: FALLBACK_MODEL.to_string(),
                usage: TokenUsage::approximated(query, ""),
                context_used,
            }));
        };

        let mut built = prompt::build_prompt(
            query,
            &context,
            engine.prompt.as_deref(),
            engine.use_web_search,
        );

        if engine.use_web_search {
            let hits = self.web_search.search(query, WEB_SEARCH_FETCH).await;
            let kept: Vec<_> = hits.into_iter().take(WEB_SEARCH_KEEP).collect();
            built = prompt::splice_web_results(&built, &kept);
        }

        let temperature = engine.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        let request = GenerationRequest::new(built).with_temperature(temperature);

        let model_choice = engine.model.as_deref().unwrap_or_default();
        let provider = match self.router.resolve(model_choice) {
            Ok(provider) => provider,
            Err(e) => {
                return Ok(ExecutionOutcome::Failed {
                    error: e.to_string(),
                });
            }
        };

        match provider.generate(request).await {
            Ok(generation) => Ok(ExecutionOutcome::Success(ExecutionResult {
                response: generation.text,
                model: generation.model,
                usage: generation.usage,
                context_used,
            })),
            Err(e) => {
                warn!(workflow_id, error = %e, "Generation failed");
                Ok(ExecutionOutcome::Failed {
                    error: e.to_string(),
                })
            }
        }
    }

    /// Top matches from the workflow's knowledge base, joined by newlines.
    /// Empty when no knowledge base is configured or retrieval fails.
    async fn retrieve_context(
        &self,
        workflow_id: &str,
        query: &str,
        components: &[Component],
    ) -> String {
        let Some(kb) = first_knowledge_base(components) else {
            return String::new();
        };

        let collection = kb
            .collection_name
            .clone()
            .unwrap_or_else(|| format!("workflow_{}", workflow_id));

        let results = self
            .vector_store
            .query(&collection, query, RETRIEVAL_TOP_K)
            .await;

        results
            .into_iter()
            .map(|r| r.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// First knowledge-base component in storage order, if any
fn first_knowledge_base(components: &[Component]) -> Option<&KnowledgeBaseConfig> {
    components.iter().find_map(|c| match &c.config {
        ComponentConfig::KnowledgeBase(config) => Some(config),
        _ => None,
    })
}

/// First LLM engine component in storage order, if any
fn first_llm_engine(components: &[Component]) -> Option<&LlmEngineConfig> {
    components.iter().find_map(|c| match &c.config {
        ComponentConfig::LlmEngine(config) => Some(config),
        _ => None,
    })
}
