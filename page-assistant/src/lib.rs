//! Page-grounded question answering with a verified excerpt.
//!
//! Public API: [`ask`]. It runs the configured [`Interpreter`], encodes the
//! page context, and only surfaces the answer when its excerpt is quoted
//! from that context. Every other outcome is the fixed fallback answer.

mod cfg;
mod error;
mod interpreter;
pub mod prompt;
pub mod reply;

pub use cfg::{AssistantConfig, DEFAULT_MAX_CTX_CHARS};
pub use error::AssistantError;
pub use interpreter::{ExternalModel, Interpreter};

pub use answer_engine::{ChatAnswer, ContextRecord};

use answer_engine::{Verification, check, encode_records};
use tracing::{debug, info, instrument, warn};

/// Answers `question` from `context`, returning either a verified answer
/// or [`ChatAnswer::fallback`]. Never fails.
///
/// # Example
/// ```no_run
/// # use page_assistant::{ask, ContextRecord, Interpreter};
/// # #[tokio::main] async fn main() {
/// let context: Vec<ContextRecord> = serde_json::from_str(r#"[{"airline": "IndiGo", "price": 3000}]"#).unwrap();
/// let out = ask(&Interpreter::Deterministic, "cheapest flight?", &context).await;
/// assert!(out.excerpt.is_some());
/// # }
/// ```
#[instrument(skip_all, fields(interpreter = interpreter.kind(), records = context.len()))]
pub async fn ask(interpreter: &Interpreter, question: &str, context: &[ContextRecord]) -> ChatAnswer {
    let candidate = match interpreter.answer(question, context).await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "interpreter failed, answering with fallback");
            return ChatAnswer::fallback();
        }
    };

    let blob = encode_records(context);
    gate(&blob, candidate)
}

/// Keeps `candidate` only when its answer is non-empty and its excerpt verifies.
fn gate(context_blob: &str, candidate: ChatAnswer) -> ChatAnswer {
    if candidate.answer.trim().is_empty() {
        debug!("empty candidate answer");
        return ChatAnswer::fallback();
    }

    match check(context_blob, candidate.excerpt.as_deref()) {
        Verification::Rejected => {
            info!(
                has_excerpt = candidate.excerpt.is_some(),
                "excerpt not found in page context, answering with fallback"
            );
            ChatAnswer::fallback()
        }
        outcome => {
            debug!(?outcome, "excerpt verified");
            candidate
        }
    }
}
