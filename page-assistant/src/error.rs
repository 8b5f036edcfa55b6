//! Typed error for the page-assistant crate.

use ai_llm_service::error_handler::AiLlmError;
use ai_llm_service::services::ollama_service::OllamaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    /// Configuration or setup errors from the LLM service crate.
    #[error("LLM service error: {0}")]
    Llm(#[from] AiLlmError),

    /// Transport, status, or decode errors from the chat call.
    #[error("model chat error: {0}")]
    Chat(#[from] OllamaError),

    /// The model returned nothing usable.
    #[error("empty model reply")]
    EmptyReply,
}
