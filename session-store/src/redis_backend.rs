use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// How long startup waits for the first connection and `PING`.
pub const CONNECT_TIMEOUT_SECS: u64 = 3;

/// Redis-backed store over a shared, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisStore {
    con: ConnectionManager,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Opens a connection to `url` and checks it with `PING`.
    ///
    /// # Errors
    /// [`StoreError::Redis`] for a bad URL or refused connection,
    /// [`StoreError::Timeout`] when the server does not answer in time.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let timeout = Duration::from_secs(CONNECT_TIMEOUT_SECS);
        let client = redis::Client::open(url)?;

        let handshake = async {
            let mut con = client.get_connection_manager().await?;
            let pong: String = redis::cmd("PING").query_async(&mut con).await?;
            Ok::<_, StoreError>((con, pong))
        };

        let (con, pong) = tokio::time::timeout(timeout, handshake)
            .await
            .map_err(|_| StoreError::Timeout(CONNECT_TIMEOUT_SECS))??;

        info!(%url, %pong, "connected to redis");
        Ok(Self { con })
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut con = self.con.clone();
        let secs = ttl.as_secs().max(1);
        con.set_ex::<_, _, ()>(key, value, secs).await?;
        debug!(key, ttl_secs = secs, "stored context in redis");
        Ok(())
    }

    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut con = self.con.clone();
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }
}
