use ai_llm_service::health_service::HealthService;
use axum::http::HeaderValue;
use page_assistant::Interpreter;
use session_store::ContextStore;
use tracing::info;

use crate::core::config::{AppConfig, ConfigError};
use crate::error_handler::AppResult;

/// Health probes must not hold up `/health` for long.
const HEALTH_TIMEOUT_SECS: u64 = 3;

/// Shared state for all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Question interpreter chosen at startup.
    pub interpreter: Interpreter,
    /// Session context store (Redis or in-memory fallback).
    pub store: ContextStore,
    /// Best-effort model endpoint probe.
    pub health: HealthService,
    /// Value of `Access-Control-Allow-Origin`.
    pub cors_origin: HeaderValue,
}

impl AppState {
    pub fn new(
        interpreter: Interpreter,
        store: ContextStore,
        health: HealthService,
        cors_origin: HeaderValue,
    ) -> Self {
        Self {
            interpreter,
            store,
            health,
            cors_origin,
        }
    }

    /// Builds state from config: picks the interpreter and connects the store.
    pub async fn from_config(cfg: &AppConfig) -> AppResult<Self> {
        let cors_origin =
            HeaderValue::from_str(&cfg.cors_allow_origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ALLOW_ORIGIN",
                reason: e.to_string(),
            })?;

        let interpreter = Interpreter::from_config(&cfg.assistant);
        let store = ContextStore::connect(&cfg.store).await;
        let health = HealthService::new(Some(HEALTH_TIMEOUT_SECS))?;

        info!(
            interpreter = interpreter.kind(),
            store = store.kind(),
            "application state ready"
        );

        Ok(Self::new(interpreter, store, health, cors_origin))
    }
}
