//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, GeminiConfig, LogFormat, LoggingConfig, OpenAiConfig, ProvidersConfig,
    SerpApiConfig, ServerConfig, StorageConfig, UploadsConfig,
};
