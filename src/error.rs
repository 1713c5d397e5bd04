use thiserror::Error;

/// Errors produced by cache operations.
///
/// Callers are expected to branch on the variant: a [`Error::CacheMiss`] from
/// `get` or `delete` is a normal outcome, while [`Error::Store`] means the
/// backend itself misbehaved.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cache: key not found")]
    CacheMiss,

    #[error("cache: not stored")]
    NotStored,

    #[error("cache: operation not supported by this backend")]
    NotSupported,

    #[error("serialize: {0}")]
    Serialize(String),

    #[error("deserialize: {0}")]
    Deserialize(String),

    #[error("parse: {0}")]
    Parse(String),

    #[error("store: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<deadpool_redis::PoolError> for Error {
    fn from(err: deadpool_redis::PoolError) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<deadpool_redis::redis::RedisError> for Error {
    fn from(err: deadpool_redis::redis::RedisError) -> Self {
        Error::Store(err.to_string())
    }
}
