//! Application state for shared services

use std::sync::Arc;

use crate::domain::search::WebSearchProvider;
use crate::infrastructure::llm::GenerationRouter;
use crate::infrastructure::services::{ChatService, DocumentService, WorkflowService};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub workflow_service: Arc<WorkflowService>,
    pub chat_service: Arc<ChatService>,
    pub document_service: Arc<DocumentService>,
    pub router: Arc<GenerationRouter>,
    pub web_search: Arc<dyn WebSearchProvider>,
}

impl AppState {
    pub fn new(
        workflow_service: Arc<WorkflowService>,
        chat_service: Arc<ChatService>,
        document_service: Arc<DocumentService>,
        router: Arc<GenerationRouter>,
        web_search: Arc<dyn WebSearchProvider>,
    ) -> Self {
        Self {
            workflow_service,
            chat_service,
            document_service,
            router,
            web_search,
        }
    }
}
