//! Runtime configuration loaded from environment variables.

use ai_llm_service::error_handler::{env_opt_bool, env_opt_u64};

use crate::error::AssistantError;

/// Default clamp for the encoded page context placed in the model prompt.
pub const DEFAULT_MAX_CTX_CHARS: usize = 12_000;

/// Knobs for interpreter selection and prompt building.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Use the deterministic interpreter instead of the external model.
    pub use_mock: bool,
    /// Max chars of encoded context sent to the model.
    pub max_ctx_chars: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            max_ctx_chars: DEFAULT_MAX_CTX_CHARS,
        }
    }
}

impl AssistantConfig {
    /// Reads `USE_MOCK_LLM` (default `true`) and `CONTEXT_PROMPT_MAX_CHARS`
    /// (default 12000).
    ///
    /// # Errors
    /// Returns [`AssistantError::Llm`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, AssistantError> {
        let dflt = Self::default();
        let use_mock = env_opt_bool("USE_MOCK_LLM")?.unwrap_or(dflt.use_mock);
        let max_ctx_chars = env_opt_u64("CONTEXT_PROMPT_MAX_CHARS")?
            .map(|n| n as usize)
            .unwrap_or(dflt.max_ctx_chars);

        Ok(Self {
            use_mock,
            max_ctx_chars,
        })
    }
}
