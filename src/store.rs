use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::backend::{Backend, RedisBackend};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::expiry::Expiry;
use crate::serialize::{JsonSerializer, Serializer};

/// Cache store over a key-value backend.
///
/// Applies the cache contract on top of the backend's primitive commands:
/// existence preconditions for `add`/`replace`/`delete`, expiration
/// resolution for writes, and the saturating decrement. Conditional
/// operations take two round trips and are not atomic; between the check and
/// the mutation another caller may interleave, and the last write wins. The
/// backend is the authority on state, so no client-side locking is attempted.
pub struct Store<B, S = JsonSerializer> {
    backend: Arc<B>,
    serializer: S,
    default_expiry: Duration,
}

/// Store wired to the Redis adapter.
pub type RedisStore<S = JsonSerializer> = Store<RedisBackend, S>;

impl<B, S: Clone> Clone for Store<B, S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            serializer: self.serializer.clone(),
            default_expiry: self.default_expiry,
        }
    }
}

impl RedisStore {
    /// Build the connection pool from settings.
    pub fn connect(config: &Config) -> Result<Self> {
        let backend = RedisBackend::connect(config)?;
        Ok(Self::with_backend(
            Arc::new(backend),
            config.default_expiry,
        ))
    }

    /// Use a caller-supplied pool.
    pub fn with_pool(pool: deadpool_redis::Pool, default_expiry: Duration) -> Self {
        Self::with_backend(Arc::new(RedisBackend::new(pool)), default_expiry)
    }
}

impl<B: Backend> Store<B> {
    pub fn with_backend(backend: Arc<B>, default_expiry: Duration) -> Self {
        Self::with_serializer(backend, JsonSerializer, default_expiry)
    }
}

impl<B: Backend, S: Serializer> Store<B, S> {
    pub fn with_serializer(backend: Arc<B>, serializer: S, default_expiry: Duration) -> Self {
        Self {
            backend,
            serializer,
            default_expiry,
        }
    }

    /// Unconditional write.
    pub async fn set<V>(&self, key: &str, value: &V, expiry: Expiry) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        let payload = self.encode(value)?;
        self.write(key, &payload, expiry).await
    }

    /// Write only when the key is absent. The existence probe and the write
    /// are separate round trips; concurrent adds can both pass the probe.
    pub async fn add<V>(&self, key: &str, value: &V, expiry: Expiry) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        if self.probe(key).await {
            return Err(Error::NotStored);
        }
        self.set(key, value, expiry).await
    }

    /// Write only when the key already exists. Passing `None` is the legacy
    /// "no value" sentinel: the serialized null still lands in the store,
    /// but the call reports [`Error::NotStored`].
    pub async fn replace<V>(&self, key: &str, value: Option<&V>, expiry: Expiry) -> Result<()>
    where
        V: Serialize,
    {
        if !self.probe(key).await {
            return Err(Error::NotStored);
        }
        self.set(key, &value, expiry).await?;
        if value.is_none() {
            return Err(Error::NotStored);
        }
        Ok(())
    }

    /// Read and decode. A nil reply is a [`Error::CacheMiss`] before any
    /// other classification.
    pub async fn get<V>(&self, key: &str) -> Result<V>
    where
        V: DeserializeOwned,
    {
        let raw = self.backend.get(key).await?;
        let payload = raw.ok_or(Error::CacheMiss)?;
        self.serializer
            .deserialize(&payload)
            .map_err(|err| Error::Deserialize(err.to_string()))
    }

    /// Presence probe. Never errors: a transport failure reads as `false`.
    pub async fn exists(&self, key: &str) -> bool {
        self.probe(key).await
    }

    /// Set or refresh a TTL, truncated to whole seconds. Never errors: any
    /// failure reads as `false`.
    pub async fn set_expire(&self, key: &str, ttl: Duration) -> bool {
        match self.backend.expire(key, ttl.as_secs() as i64).await {
            Ok(changed) => changed,
            Err(err) => {
                debug!(key, error = %err, "expire failed");
                false
            }
        }
    }

    /// Remove a key. [`Error::CacheMiss`] when it is absent.
    pub async fn delete(&self, key: &str) -> Result<()> {
        if !self.probe(key).await {
            return Err(Error::CacheMiss);
        }
        self.backend.del(key).await
    }

    /// Add `delta` to a stored integer and return the sum.
    ///
    /// The read doubles as the existence check, so a missing key is a
    /// [`Error::CacheMiss`] and the backend never auto-creates one. The sum
    /// is written back as plain decimal text rather than through a native
    /// increment; read-then-write, not atomic.
    pub async fn increment(&self, key: &str, delta: u64) -> Result<u64> {
        let raw = self.backend.get(key).await?;
        let payload = raw.ok_or(Error::CacheMiss)?;
        let current = parse_integer(&payload)?;
        let sum = current.wrapping_add(delta as i64);
        self.backend
            .set(key, sum.to_string().as_bytes())
            .await?;
        Ok(sum as u64)
    }

    /// Subtract `delta` from a stored integer, clamped at zero.
    ///
    /// When `delta` exceeds the current value the decrement is issued for
    /// the current value instead, landing exactly on zero. The backend's
    /// atomic DECRBY produces the reported value.
    pub async fn decrement(&self, key: &str, delta: u64) -> Result<u64> {
        if !self.probe(key).await {
            return Err(Error::CacheMiss);
        }
        let amount = match self.read_integer(key).await {
            Some(current) if delta > current as u64 => current,
            _ => delta as i64,
        };
        let value = self.backend.decr_by(key, amount).await?;
        Ok(value as u64)
    }

    /// Clear every key in the selected database, not just this store's.
    pub async fn flush(&self) -> Result<()> {
        self.backend.flush_db().await
    }

    /// Quiet existence check backing the conditional operations; a failed
    /// probe reads as absent.
    async fn probe(&self, key: &str) -> bool {
        match self.backend.exists(key).await {
            Ok(found) => found,
            Err(err) => {
                debug!(key, error = %err, "existence probe failed");
                false
            }
        }
    }

    async fn read_integer(&self, key: &str) -> Option<i64> {
        let raw = self.backend.get(key).await.ok()??;
        std::str::from_utf8(&raw).ok()?.trim().parse::<i64>().ok()
    }

    fn encode<V>(&self, value: &V) -> Result<Vec<u8>>
    where
        V: Serialize + ?Sized,
    {
        self.serializer
            .serialize(value)
            .map_err(|err| Error::Serialize(err.to_string()))
    }

    async fn write(&self, key: &str, payload: &[u8], expiry: Expiry) -> Result<()> {
        let ttl = expiry.resolve(self.default_expiry);
        if ttl > Duration::ZERO {
            self.backend.set_ex(key, ttl.as_secs(), payload).await
        } else {
            self.backend.set(key, payload).await
        }
    }
}

fn parse_integer(payload: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| Error::Parse("stored value is not valid utf-8".to_string()))?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| Error::Parse(format!("stored value is not an integer: {text:?}")))
}
