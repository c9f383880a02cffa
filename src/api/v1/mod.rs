//! v1 API endpoints

pub mod chat;
pub mod documents;
pub mod llm;
pub mod workflows;

use axum::{
    Router,
    routing::{get, post, put},
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // Workflow builder
        .route(
            "/workflows",
            post(workflows::create_workflow).get(workflows::list_workflows),
        )
        .route(
            "/workflows/{id}",
            get(workflows::get_workflow)
                .put(workflows::update_workflow)
                .delete(workflows::delete_workflow),
        )
        .route("/workflows/{id}/components", post(workflows::add_component))
        .route(
            "/workflows/components/{component_id}",
            put(workflows::update_component),
        )
        .route("/workflows/{id}/validate", get(workflows::validate_workflow))
        .route("/workflows/{id}/execute", post(workflows::execute_workflow))
        // Chat sessions over workflows
        .route("/chat/{workflow_id}/send", post(chat::send_message))
        .route("/chat/{workflow_id}/history", get(chat::workflow_history))
        .route("/chat/sessions/new", post(chat::new_session))
        .route(
            "/chat/sessions/{session_id}",
            get(chat::session_messages).delete(chat::delete_session),
        )
        .route(
            "/chat/sessions/{session_id}/summary",
            get(chat::session_summary),
        )
        // Direct generation
        .route("/llm/generate", post(llm::generate))
        .route("/llm/generate-with-context", post(llm::generate_with_context))
        .route("/llm/web-search", post(llm::web_search))
        .route("/llm/models", get(llm::list_models))
        // Documents
        .route(
            "/documents",
            get(documents::list_documents),
        )
        .route("/documents/upload", post(documents::upload_document))
        .route(
            "/documents/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/documents/{id}/process", post(documents::process_document))
}
