//! Infrastructure services

mod chat_service;
mod document_service;
mod workflow_service;

pub use chat_service::{ChatService, ChatTurn, DEFAULT_HISTORY_LIMIT, SessionSummary};
pub use document_service::{DEFAULT_MAX_FILE_SIZE, DocumentService, UploadRequest};
pub use workflow_service::{
    AddComponentRequest, CreateWorkflowRequest, UpdateComponentRequest, UpdateWorkflowRequest,
    WorkflowService,
};
