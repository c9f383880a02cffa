//! Workflow builder service for LLM pipelines
//!
//! Lets users assemble a pipeline from four component types (user query,
//! knowledge base, LLM engine, output), validate it structurally, and run
//! queries through it with optional vector retrieval and web search.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::chat::ChatMessage;
use domain::document::Document;
use domain::embedding::EmbeddingProvider;
use domain::llm::GenerationProvider;
use domain::search::WebSearchProvider;
use domain::storage::Storage;
use domain::vector::VectorStore;
use domain::workflow::{Component, Workflow};
use infrastructure::document::PdfTextExtractor;
use infrastructure::embedding::OpenAiEmbeddingProvider;
use infrastructure::http::HttpClient;
use infrastructure::llm::{GeminiProvider, GenerationRouter, OpenAiProvider};
use infrastructure::search::SerpApiSearchProvider;
use infrastructure::services::{ChatService, DocumentService, WorkflowService};
use infrastructure::storage::{InMemoryStorage, PostgresConfig, PostgresStorage};
use infrastructure::vector::InMemoryVectorStore;

struct Backends {
    workflows: Arc<dyn Storage<Workflow>>,
    components: Arc<dyn Storage<Component>>,
    messages: Arc<dyn Storage<ChatMessage>>,
    documents: Arc<dyn Storage<Document>>,
}

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let client = HttpClient::new();

    let mut router = GenerationRouter::new();
    if let Some(api_key) = &config.providers.openai.api_key {
        info!("OpenAI generation backend configured");
        let provider = OpenAiProvider::new(
            client.clone(),
            api_key.clone(),
            config.providers.openai.model.clone(),
        );
        router = router.with_openai(Arc::new(provider) as Arc<dyn GenerationProvider>);
    }
    if let Some(api_key) = &config.providers.gemini.api_key {
        info!("Gemini generation backend configured");
        let provider = GeminiProvider::new(
            client.clone(),
            api_key.clone(),
            config.providers.gemini.model.clone(),
        );
        router = router.with_gemini(Arc::new(provider) as Arc<dyn GenerationProvider>);
    }
    let router = Arc::new(router);

    // Retrieval stack. Embedding calls fail at request time when no OpenAI
    // key is configured; the vector store degrades to empty results.
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbeddingProvider::new(
        client.clone(),
        config.providers.openai.api_key.clone().unwrap_or_default(),
    ));
    let vector_store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new(
        embedder,
        config.providers.openai.embedding_model.clone(),
    ));

    let web_search: Arc<dyn WebSearchProvider> = Arc::new(SerpApiSearchProvider::new(
        client,
        config.providers.serpapi.api_key.clone(),
    ));

    let backends = create_storage_backends(config).await?;

    let workflow_service = Arc::new(WorkflowService::new(
        backends.workflows,
        backends.components,
        router.clone(),
        vector_store,
        web_search.clone(),
    ));

    let chat_service = Arc::new(ChatService::new(
        backends.messages,
        workflow_service.clone(),
    ));

    let document_service = Arc::new(DocumentService::new(
        backends.documents,
        Arc::new(PdfTextExtractor::new()),
        config.uploads.dir.clone(),
        config.uploads.max_file_size,
    ));

    Ok(AppState::new(
        workflow_service,
        chat_service,
        document_service,
        router,
        web_search,
    ))
}

async fn create_storage_backends(config: &AppConfig) -> anyhow::Result<Backends> {
    if config.storage.backend.eq_ignore_ascii_case("postgres") {
        let database_url = config
            .storage
            .database_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for the postgres backend"))?;

        info!("Using PostgreSQL storage");
        let pg_config = PostgresConfig::new(database_url);
        let workflows =
            PostgresStorage::<Workflow>::connect(&pg_config, "workflows").await?;
        let pool = workflows.pool().clone();
        let components = PostgresStorage::<Component>::new(pool.clone(), "components");
        let messages = PostgresStorage::<ChatMessage>::new(pool.clone(), "chat_messages");
        let documents = PostgresStorage::<Document>::new(pool, "documents");

        workflows.ensure_table().await?;
        components.ensure_table().await?;
        messages.ensure_table().await?;
        documents.ensure_table().await?;

        Ok(Backends {
            workflows: Arc::new(workflows),
            components: Arc::new(components),
            messages: Arc::new(messages),
            documents: Arc::new(documents),
        })
    } else {
        info!("Using in-memory storage");
        Ok(Backends {
            workflows: Arc::new(InMemoryStorage::<Workflow>::new()),
            components: Arc::new(InMemoryStorage::<Component>::new()),
            messages: Arc::new(InMemoryStorage::<ChatMessage>::new()),
            documents: Arc::new(InMemoryStorage::<Document>::new()),
        })
    }
}
