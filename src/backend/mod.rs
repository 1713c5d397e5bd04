use async_trait::async_trait;

use crate::error::Result;

mod memory;
mod redis;

pub use memory::MemoryBackend;
pub use redis::RedisBackend;

/// Port over the primitive command set the store needs from a key-value
/// backend. Adapters own connection handling; one logical command maps to one
/// round trip.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// GET: raw payload, or `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// SET: unconditional write, no expiration.
    async fn set(&self, key: &str, payload: &[u8]) -> Result<()>;

    /// SETEX: write with a TTL in whole seconds. Backends reject zero.
    async fn set_ex(&self, key: &str, seconds: u64, payload: &[u8]) -> Result<()>;

    /// EXISTS: presence probe.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// EXPIRE: set or refresh a TTL; `true` when the backend confirmed it.
    async fn expire(&self, key: &str, seconds: i64) -> Result<bool>;

    /// DEL: remove a key.
    async fn del(&self, key: &str) -> Result<()>;

    /// DECRBY: atomic decrement, returning the new value.
    async fn decr_by(&self, key: &str, delta: i64) -> Result<i64>;

    /// FLUSHDB: clear every key in the selected database.
    async fn flush_db(&self) -> Result<()>;
}
