//! Prefixed, typed cache client over Redis.
//!
//! Two layers compose the crate: [`Store`] applies the cache contract
//! (existence preconditions, expiration resolution, saturating decrement)
//! over a pooled connection, and [`Service`] namespaces every key with a
//! `{prefix}:` so multiple logical callers can share one pool.
//!
//! ```no_run
//! use redcache::{Config, Expiry, RedisStore, Service};
//! use std::time::Duration;
//!
//! # async fn run() -> redcache::Result<()> {
//! let store = RedisStore::connect(&Config::from_env())?;
//! store.set("greeting", "hello", Expiry::After(Duration::from_secs(60))).await?;
//! let greeting: String = store.get("greeting").await?;
//!
//! let sessions = Service::new(store.clone(), "sessions");
//! sessions.set("u1", "token", Expiry::Default).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Conditional operations (`add`, `replace`, `delete`, `increment`) check
//! existence and mutate in separate round trips and are deliberately not
//! atomic; see [`Store`] for the consistency contract.

mod backend;
mod config;
mod error;
mod expiry;
mod serialize;
mod service;
mod store;

pub use backend::{Backend, MemoryBackend, RedisBackend};
pub use config::Config;
pub use error::{Error, Result};
pub use expiry::Expiry;
pub use serialize::{CodecError, JsonSerializer, Serializer};
pub use service::Service;
pub use store::{RedisStore, Store};

// Callers building their own pool work against these directly.
pub use deadpool_redis;
