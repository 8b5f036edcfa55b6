//! POST /api/chat: answer a question from the current page context.

use std::sync::Arc;

use axum::{Json, extract::State};
use page_assistant::{ChatAnswer, ask};
use tracing::{info, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::ChatRequest,
};

/// Handler: POST /api/chat
///
/// Stores the context for the session (failures are logged, not returned),
/// then answers with a verified excerpt or the fallback sentence.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"session_id":"abc","question":"cheapest Air India after 6 pm?","context":[{"airline":"Air India","departure_time":"7:00 PM","price":5000}]}'
/// ```
#[instrument(
    name = "chat_route",
    skip(state, body),
    fields(session_id = %body.session_id, records = body.context.len())
)]
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatAnswer>> {
    let session_id = body.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::BadRequest("session_id must not be empty".into()));
    }

    if let Err(e) = state.store.set_context(session_id, &body.context, None).await {
        warn!(error = %e, store = state.store.kind(), "failed to store session context, continuing");
    }

    let out = ask(&state.interpreter, &body.question, &body.context).await;
    info!(
        interpreter = state.interpreter.kind(),
        answered = !out.is_fallback(),
        "chat answered"
    );

    Ok(Json(out))
}
