use async_trait::async_trait;
use deadpool_redis::redis::cmd;
use deadpool_redis::{Pool, PoolConfig, Runtime};

use crate::config::Config;
use crate::error::{Error, Result};

use super::Backend;

/// Redis adapter over a deadpool connection pool.
///
/// Every command draws one connection from the pool and returns it when the
/// guard drops, on the success and failure paths alike. Connection setup
/// (AUTH, SELECT) and recycle-time health checks belong to the pool.
pub struct RedisBackend {
    pool: Pool,
}

impl RedisBackend {
    /// Wrap an already-configured pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a pool from connection settings.
    pub fn connect(config: &Config) -> Result<Self> {
        let mut pool_config = deadpool_redis::Config::from_url(config.url());
        pool_config.pool = Some(PoolConfig::new(config.pool_size));
        let pool = pool_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| Error::Store(err.to_string()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.pool.get().await?;
        let raw: Option<Vec<u8>> = cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(raw)
    }

    async fn set(&self, key: &str, payload: &[u8]) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let _: () = cmd("SET")
            .arg(key)
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn set_ex(&self, key: &str, seconds: u64, payload: &[u8]) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let _: () = cmd("SETEX")
            .arg(key)
            .arg(seconds)
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let found: bool = cmd("EXISTS").arg(key).query_async(&mut conn).await?;
        Ok(found)
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let changed: bool = cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async(&mut conn)
            .await?;
        Ok(changed)
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let _: i64 = cmd("DEL").arg(key).query_async(&mut conn).await?;
        Ok(())
    }

    async fn decr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.pool.get().await?;
        let value: i64 = cmd("DECRBY")
            .arg(key)
            .arg(delta)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    async fn flush_db(&self) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let _: () = cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }
}
