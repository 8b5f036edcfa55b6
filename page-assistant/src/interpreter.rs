//! Interpreter selection: deterministic ranking or an external chat model.

use ai_llm_service::config::default_config::config_ollama_chat;
use ai_llm_service::error_handler::AiLlmError;
use ai_llm_service::llm::LlmModelConfig;
use ai_llm_service::services::ollama_service::OllamaService;
use answer_engine::{ChatAnswer, ContextRecord, encode_records, interpret};
use tracing::{debug, info, warn};

use crate::cfg::AssistantConfig;
use crate::error::AssistantError;
use crate::prompt::{build_user_prompt, system_prompt};
use crate::reply::parse_reply;

/// Closed set of question interpreters.
#[derive(Debug)]
pub enum Interpreter {
    /// Rule-based cheapest-flight ranking over the page records.
    Deterministic,
    /// Ollama chat model prompted with the encoded page context.
    ExternalModel(ExternalModel),
}

impl Interpreter {
    /// Picks the interpreter from env-driven config.
    ///
    /// Falls back to [`Interpreter::Deterministic`] (with a warning) when the
    /// external model is requested but its config or client cannot be built.
    pub fn from_config(cfg: &AssistantConfig) -> Self {
        if cfg.use_mock {
            return Self::Deterministic;
        }
        Self::from_model_config(cfg, config_ollama_chat())
    }

    /// Same as [`Interpreter::from_config`] with an already resolved model config.
    pub fn from_model_config(
        cfg: &AssistantConfig,
        model: Result<LlmModelConfig, AiLlmError>,
    ) -> Self {
        if cfg.use_mock {
            return Self::Deterministic;
        }

        let built = model
            .and_then(|m| OllamaService::new(m).map_err(AiLlmError::from))
            .map(|chat| ExternalModel::new(chat, cfg.max_ctx_chars));

        match built {
            Ok(model) => {
                info!(model = %model.config().model, "external model interpreter enabled");
                Self::ExternalModel(model)
            }
            Err(e) => {
                warn!(error = %e, "external model unavailable, using deterministic interpreter");
                Self::Deterministic
            }
        }
    }

    /// Short label for logs and health output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::ExternalModel(_) => "ollama",
        }
    }

    /// Model config when an external model is in use.
    pub fn model_config(&self) -> Option<&LlmModelConfig> {
        match self {
            Self::Deterministic => None,
            Self::ExternalModel(m) => Some(m.config()),
        }
    }

    /// Produces a candidate answer. The excerpt is not verified here.
    ///
    /// # Errors
    /// Only the external model can fail: transport, status, decode, or an
    /// empty reply.
    pub async fn answer(
        &self,
        question: &str,
        context: &[ContextRecord],
    ) -> Result<ChatAnswer, AssistantError> {
        match self {
            Self::Deterministic => Ok(interpret(question, context)),
            Self::ExternalModel(m) => m.answer(question, context).await,
        }
    }
}

/// Chat-model interpreter over a single Ollama client.
#[derive(Debug)]
pub struct ExternalModel {
    chat: OllamaService,
    max_ctx_chars: usize,
}

impl ExternalModel {
    pub fn new(chat: OllamaService, max_ctx_chars: usize) -> Self {
        Self {
            chat,
            max_ctx_chars,
        }
    }

    pub fn config(&self) -> &LlmModelConfig {
        self.chat.config()
    }

    async fn answer(
        &self,
        question: &str,
        context: &[ContextRecord],
    ) -> Result<ChatAnswer, AssistantError> {
        let blob = encode_records(context);
        let user = build_user_prompt(question, &blob, self.max_ctx_chars);
        debug!(
            context_chars = blob.len(),
            prompt_chars = user.len(),
            "prompting external model"
        );

        let raw = self.chat.chat(&system_prompt(), &user).await?;
        if raw.trim().is_empty() {
            return Err(AssistantError::EmptyReply);
        }
        Ok(parse_reply(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::error_handler::ConfigError;
    use ai_llm_service::llm::LlmProvider;

    fn model_cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen2.5:7b".into(),
            endpoint: endpoint.into(),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(2),
        }
    }

    fn external() -> AssistantConfig {
        AssistantConfig {
            use_mock: false,
            ..AssistantConfig::default()
        }
    }

    #[test]
    fn mock_flag_selects_deterministic() {
        let i = Interpreter::from_model_config(
            &AssistantConfig::default(),
            Ok(model_cfg("http://localhost:11434")),
        );
        assert_eq!(i.kind(), "deterministic");
        assert!(i.model_config().is_none());
    }

    #[test]
    fn missing_model_config_falls_back() {
        let i = Interpreter::from_model_config(
            &external(),
            Err(ConfigError::MissingVar("OLLAMA_MODEL").into()),
        );
        assert_eq!(i.kind(), "deterministic");
    }

    #[test]
    fn bad_endpoint_falls_back() {
        let i = Interpreter::from_model_config(&external(), Ok(model_cfg("localhost:11434")));
        assert_eq!(i.kind(), "deterministic");
    }

    #[test]
    fn valid_model_config_selects_external() {
        let i = Interpreter::from_model_config(&external(), Ok(model_cfg("http://localhost:11434")));
        assert_eq!(i.kind(), "ollama");
        assert_eq!(i.model_config().map(|c| c.model.as_str()), Some("qwen2.5:7b"));
    }

    #[tokio::test]
    async fn unreachable_model_is_an_error() {
        let i = Interpreter::from_model_config(&external(), Ok(model_cfg("http://127.0.0.1:9")));
        let err = i.answer("cheapest?", &[]).await.unwrap_err();
        assert!(matches!(err, AssistantError::Chat(_)));
    }
}
