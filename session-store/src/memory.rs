//! Process-local store used when Redis is unreachable.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::trace;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// TTL-aware map of key to encoded context.
///
/// Expired entries are evicted on access, and every write sweeps the whole
/// map so keys that are never read again do not accumulate.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: String, value: String, ttl: Duration) {
        let now = Instant::now();
        let entry = Entry {
            value,
            expires_at: now + ttl,
        };

        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, e| e.expires_at > now);
        let swept = before - map.len();
        if swept > 0 {
            trace!(swept, "swept expired contexts");
        }
        map.insert(key, entry);
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let map = self.inner.read().await;
            match map.get(key) {
                None => return None,
                Some(e) if e.expires_at > now => return Some(e.value.clone()),
                Some(_) => {}
            }
        }

        let mut map = self.inner.write().await;
        if map.get(key).is_some_and(|e| e.expires_at <= now) {
            map.remove(key);
            trace!(key, "evicted expired context");
        }
        None
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    async fn stored(s: &MemoryStore) -> usize {
        s.inner.read().await.len()
    }

    #[tokio::test]
    async fn set_then_get() {
        let s = MemoryStore::new();
        s.set("k".into(), "[]".into(), Duration::from_secs(60)).await;
        assert_eq!(s.get("k").await.as_deref(), Some("[]"));
        assert_eq!(s.get("missing").await, None);
    }

    #[tokio::test]
    async fn expired_entries_are_absent_and_evicted() {
        let s = MemoryStore::new();
        s.set("k".into(), "[]".into(), Duration::from_millis(20)).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(s.get("k").await, None);
        assert_eq!(stored(&s).await, 0);
    }

    #[tokio::test]
    async fn overwrite_refreshes_value_and_ttl() {
        let s = MemoryStore::new();
        s.set("k".into(), "old".into(), Duration::from_millis(20)).await;
        s.set("k".into(), "new".into(), Duration::from_secs(60)).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(s.get("k").await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn writes_sweep_expired_keys_never_read_again() {
        let s = MemoryStore::new();
        for i in 0..1000 {
            s.set(format!("gone-{i}"), "[]".into(), Duration::from_millis(1))
                .await;
        }
        tokio::time::sleep(Duration::from_millis(30)).await;

        s.set("live".into(), "[]".into(), Duration::from_secs(60)).await;
        assert_eq!(stored(&s).await, 1);
        assert_eq!(s.get("live").await.as_deref(), Some("[]"));
    }
}
