//! GET /api/session/{session_id}/context: the stored page context for a session.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use page_assistant::ContextRecord;
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

pub async fn session_context_route(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Vec<ContextRecord>>> {
    match state.store.get_context(&session_id).await? {
        Some(records) => {
            debug!(%session_id, records = records.len(), "session context found");
            Ok(Json(records))
        }
        None => Err(AppError::NotFound(format!(
            "no context stored for session '{session_id}'"
        ))),
    }
}
