//! Model access for the HappyFares backend.
//!
//! - [`services::ollama_service::OllamaService`]: non-streaming chat client
//! - [`config::default_config::config_ollama_chat`]: env-driven model config
//! - [`health_service::HealthService`]: best-effort endpoint probe for `/health`
//! - [`telemetry::init`]: process-wide tracing subscriber

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
    pub mod llm_provider;
}

pub mod services {
    pub mod ollama_service;
}

pub mod error_handler;
pub mod health_service;
pub mod telemetry;

/// Short re-export path for the model config types.
pub mod llm {
    pub use crate::config::llm_model_config::LlmModelConfig;
    pub use crate::config::llm_provider::LlmProvider;
}
