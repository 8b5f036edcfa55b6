//! HTTP service configuration from environment variables.
//!
//! - `APP_HOST` (default `0.0.0.0`), `APP_PORT` (default `8080`)
//! - `REDIS_URL` (default `redis://localhost:6379/0`), `REDIS_TTL` seconds (default `3600`)
//! - `CORS_ALLOW_ORIGIN` (default `*`)
//! - `USE_MOCK_LLM`, `CONTEXT_PROMPT_MAX_CHARS`: see [`AssistantConfig::from_env`]

use std::time::Duration;

use ai_llm_service::error_handler::opt_env;
use page_assistant::{AssistantConfig, AssistantError};
use session_store::{DEFAULT_TTL_SECS, StoreConfig};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CORS_ORIGIN: &str = "*";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value in {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub assistant: AssistantConfig,
    pub cors_allow_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = opt_env("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = parse_or("APP_PORT", opt_env("APP_PORT"), DEFAULT_PORT)?;

        let store_dflt = StoreConfig::default();
        let ttl_secs = parse_or("REDIS_TTL", opt_env("REDIS_TTL"), DEFAULT_TTL_SECS)?;
        if ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "REDIS_TTL",
                reason: "must be at least 1 second".into(),
            });
        }
        let store = StoreConfig {
            redis_url: opt_env("REDIS_URL").unwrap_or(store_dflt.redis_url),
            default_ttl: Duration::from_secs(ttl_secs),
        };

        Ok(Self {
            host: host.trim().to_string(),
            port,
            store,
            assistant: AssistantConfig::from_env()?,
            cors_allow_origin: opt_env("CORS_ALLOW_ORIGIN")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, dflt: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(dflt),
        Some(v) => v.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: format!("{e} (got {v:?})"),
        }),
    }
}
