//! Per-session page context storage.
//!
//! Contexts are kept under `session:{session_id}:context` as their stable
//! JSON encoding, with a TTL. [`ContextStore::connect`] prefers Redis and
//! falls back to an in-process map when Redis cannot be reached.

mod error;
mod memory;
mod redis_backend;

use std::time::Duration;

use answer_engine::{ContextRecord, encode_records};
use tracing::{debug, warn};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use redis_backend::{CONNECT_TIMEOUT_SECS, RedisStore};

/// Default context lifetime in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Connection settings for [`ContextStore::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub redis_url: String,
    pub default_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379/0".into(),
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }
}

/// Storage key for a session's context.
pub fn context_key(session_id: &str) -> String {
    format!("session:{session_id}:context")
}

#[derive(Debug, Clone)]
enum Backend {
    Redis(RedisStore),
    Memory(MemoryStore),
}

/// Session context store over one of the supported backends.
#[derive(Debug, Clone)]
pub struct ContextStore {
    backend: Backend,
    default_ttl: Duration,
}

impl ContextStore {
    /// Connects to Redis, falling back to memory (with a warning) on any failure.
    pub async fn connect(cfg: &StoreConfig) -> Self {
        match RedisStore::connect(&cfg.redis_url).await {
            Ok(redis) => Self::with_redis(redis, cfg.default_ttl),
            Err(e) => {
                warn!(error = %e, url = %cfg.redis_url, "redis unavailable, using in-memory session store");
                Self::in_memory(cfg.default_ttl)
            }
        }
    }

    pub fn with_redis(redis: RedisStore, default_ttl: Duration) -> Self {
        Self {
            backend: Backend::Redis(redis),
            default_ttl,
        }
    }

    pub fn in_memory(default_ttl: Duration) -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
            default_ttl,
        }
    }

    /// Backend label for logs and health output.
    pub fn kind(&self) -> &'static str {
        match self.backend {
            Backend::Redis(_) => "redis",
            Backend::Memory(_) => "memory",
        }
    }

    /// Stores `records` for `session_id`. A missing or zero `ttl` uses the default.
    pub async fn set_context(
        &self,
        session_id: &str,
        records: &[ContextRecord],
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let key = context_key(session_id);
        let value = encode_records(records);
        let ttl = ttl.filter(|d| !d.is_zero()).unwrap_or(self.default_ttl);
        debug!(%key, records = records.len(), ttl_secs = ttl.as_secs(), "storing session context");

        match &self.backend {
            Backend::Redis(r) => r.set(&key, &value, ttl).await,
            Backend::Memory(m) => {
                m.set(key, value, ttl).await;
                Ok(())
            }
        }
    }

    /// Loads the stored context, `None` when absent or expired.
    pub async fn get_context(&self, session_id: &str) -> StoreResult<Option<Vec<ContextRecord>>> {
        let key = context_key(session_id);
        let raw = match &self.backend {
            Backend::Redis(r) => r.get(&key).await?,
            Backend::Memory(m) => m.get(&key).await,
        };

        match raw {
            Some(s) if !s.is_empty() => Ok(Some(serde_json::from_str(&s)?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(raw: &str) -> Vec<ContextRecord> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn key_layout() {
        assert_eq!(context_key("abc-123"), "session:abc-123:context");
    }

    #[tokio::test]
    async fn unreachable_redis_falls_back_to_memory() {
        let cfg = StoreConfig {
            redis_url: "redis://127.0.0.1:1/0".into(),
            ..StoreConfig::default()
        };
        let store = ContextStore::connect(&cfg).await;
        assert_eq!(store.kind(), "memory");
    }

    #[tokio::test]
    async fn memory_round_trip_keeps_field_order() {
        let store = ContextStore::in_memory(Duration::from_secs(60));
        let ctx = records(r#"[{"price": 3000, "airline": "IndiGo"}]"#);
        store.set_context("s1", &ctx, None).await.unwrap();

        let back = store.get_context("s1").await.unwrap().unwrap();
        assert_eq!(back, ctx);
        assert_eq!(encode_records(&back), r#"[{"price": 3000, "airline": "IndiGo"}]"#);
        assert!(store.get_context("s2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn explicit_ttl_expires_context() {
        let store = ContextStore::in_memory(Duration::from_secs(60));
        let ctx = records(r#"[{"price": 1}]"#);
        store
            .set_context("s1", &ctx, Some(Duration::from_millis(20)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.get_context("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn zero_ttl_uses_default() {
        let store = ContextStore::in_memory(Duration::from_secs(60));
        let ctx = records(r#"[{"price": 1}]"#);
        store.set_context("s1", &ctx, Some(Duration::ZERO)).await.unwrap();
        assert!(store.get_context("s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_context_is_stored_as_empty_list() {
        let store = ContextStore::in_memory(Duration::from_secs(60));
        store.set_context("s1", &[], None).await.unwrap();
        assert_eq!(store.get_context("s1").await.unwrap(), Some(vec![]));
    }
}
