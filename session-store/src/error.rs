use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("[Session Store] redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("[Session Store] stored context is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("[Session Store] redis did not answer within {0}s")]
    Timeout(u64),
}
