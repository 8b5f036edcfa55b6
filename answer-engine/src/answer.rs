use serde::{Deserialize, Serialize};

/// The only sentence shown when the page does not support an answer.
pub const FALLBACK_ANSWER: &str = "I cannot find that information on this page.";

/// Answer text plus the supporting quote from the page.
///
/// This is the response contract shared with the chat widget: exactly
/// `answer` and `excerpt` (`null` when absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default)]
    pub excerpt: Option<String>,
}

impl ChatAnswer {
    pub fn new(answer: impl Into<String>, excerpt: Option<String>) -> Self {
        Self {
            answer: answer.into(),
            excerpt,
        }
    }

    /// The fixed "not on this page" answer with no excerpt.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_ANSWER, None)
    }

    pub fn is_fallback(&self) -> bool {
        self.answer == FALLBACK_ANSWER && self.excerpt.is_none()
    }
}
