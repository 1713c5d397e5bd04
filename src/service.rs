use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{Backend, RedisBackend};
use crate::error::Result;
use crate::expiry::Expiry;
use crate::serialize::{JsonSerializer, Serializer};
use crate::store::Store;

/// Namespaced facade over a [`Store`].
///
/// Rewrites every key to `{prefix}:{key}` and delegates, so multiple logical
/// callers can share one store and pool without colliding. No semantics or
/// error kinds beyond the store's own.
pub struct Service<B, S = JsonSerializer> {
    prefix: String,
    store: Store<B, S>,
}

impl<B, S: Clone> Clone for Service<B, S> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            store: self.store.clone(),
        }
    }
}

impl Service<RedisBackend> {
    /// Namespace a caller-supplied pool. Writes with [`Expiry::Default`]
    /// never expire, matching a store default of zero.
    pub fn with_pool(pool: deadpool_redis::Pool, prefix: impl Into<String>) -> Self {
        Self::new(Store::with_pool(pool, Duration::ZERO), prefix)
    }
}

impl<B: Backend, S: Serializer> Service<B, S> {
    pub fn new(store: Store<B, S>, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            store,
        }
    }

    pub async fn get<V>(&self, key: &str) -> Result<V>
    where
        V: DeserializeOwned,
    {
        self.store.get(&self.cache_key(key)).await
    }

    pub async fn set<V>(&self, key: &str, value: &V, expiry: Expiry) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        self.store.set(&self.cache_key(key), value, expiry).await
    }

    pub async fn add<V>(&self, key: &str, value: &V, expiry: Expiry) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        self.store.add(&self.cache_key(key), value, expiry).await
    }

    pub async fn replace<V>(&self, key: &str, value: Option<&V>, expiry: Expiry) -> Result<()>
    where
        V: Serialize,
    {
        self.store
            .replace(&self.cache_key(key), value, expiry)
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(&self.cache_key(key)).await
    }

    pub async fn increment(&self, key: &str, delta: u64) -> Result<u64> {
        self.store.increment(&self.cache_key(key), delta).await
    }

    pub async fn decrement(&self, key: &str, delta: u64) -> Result<u64> {
        self.store.decrement(&self.cache_key(key), delta).await
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.store.exists(&self.cache_key(key)).await
    }

    pub async fn set_expire(&self, key: &str, ttl: Duration) -> bool {
        self.store.set_expire(&self.cache_key(key), ttl).await
    }

    /// Clears the whole database, prefixed keys and everything else alike.
    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    fn cache_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::Error;
    use std::sync::Arc;

    fn service_over(
        backend: &Arc<MemoryBackend>,
        prefix: &str,
    ) -> Service<MemoryBackend> {
        Service::new(
            Store::with_backend(Arc::clone(backend), Duration::ZERO),
            prefix,
        )
    }

    #[tokio::test]
    async fn test_effective_key_is_prefix_colon_key() {
        let backend = Arc::new(MemoryBackend::new());
        let service = service_over(&backend, "app");

        service.set("u", "value", Expiry::Forever).await.unwrap();

        let raw = backend.get("app:u").await.unwrap();
        assert_eq!(raw.as_deref(), Some(b"\"value\"".as_slice()));
    }

    #[tokio::test]
    async fn test_distinct_prefixes_never_collide() {
        let backend = Arc::new(MemoryBackend::new());
        let orders = service_over(&backend, "orders");
        let users = service_over(&backend, "users");

        orders.set("42", "order", Expiry::Forever).await.unwrap();
        users.set("42", "user", Expiry::Forever).await.unwrap();

        let order: String = orders.get("42").await.unwrap();
        let user: String = users.get("42").await.unwrap();
        assert_eq!(order, "order");
        assert_eq!(user, "user");
    }

    #[tokio::test]
    async fn test_delegation_preserves_store_semantics() {
        let backend = Arc::new(MemoryBackend::new());
        let service = service_over(&backend, "app");

        service.set("counter", &5i64, Expiry::Forever).await.unwrap();
        assert_eq!(service.increment("counter", 3).await.unwrap(), 8);
        assert_eq!(service.decrement("counter", 100).await.unwrap(), 0);

        service.delete("counter").await.unwrap();
        let missing = service.delete("counter").await;
        assert!(matches!(missing, Err(Error::CacheMiss)));
    }

    #[tokio::test]
    async fn test_flush_reaches_past_the_prefix() {
        let backend = Arc::new(MemoryBackend::new());
        let service = service_over(&backend, "app");
        backend.set("other:key", b"1").await.unwrap();
        service.set("mine", "2", Expiry::Forever).await.unwrap();

        service.flush().await.unwrap();

        assert!(!backend.exists("other:key").await.unwrap());
        assert!(!service.exists("mine").await);
    }
}
