use page_assistant::ContextRecord;
use serde::Deserialize;

/// Request payload for `POST /api/chat`, sent by the chat widget.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Browser session that owns the page context.
    pub session_id: String,
    /// The user's question.
    pub question: String,
    /// Records shown on the page (e.g. flight cards).
    pub context: Vec<ContextRecord>,
}
