//! GET /health: liveness plus a best-effort model probe.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub interpreter: &'static str,
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<HealthStatus>,
}

/// Always 200; a failing model probe is reported inside `model`.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model = match state.interpreter.model_config() {
        Some(cfg) => Some(state.health.check(cfg).await),
        None => None,
    };

    Json(HealthResponse {
        status: "ok",
        interpreter: state.interpreter.kind(),
        store: state.store.kind(),
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn deterministic_service_reports_without_model() {
        let Json(h) = health_route(State(test_state())).await;
        assert_eq!(h.status, "ok");
        assert_eq!(h.interpreter, "deterministic");
        assert_eq!(h.store, "memory");
        assert!(h.model.is_none());

        let json = serde_json::to_value(&h).unwrap();
        assert!(json.get("model").is_none());
    }
}
