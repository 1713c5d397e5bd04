use std::time::Duration;

use tracing::warn;

/// Connection and pool settings for a Redis-backed store.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Logical database index, applied with SELECT during connection setup.
    pub database: u32,
    /// TTL substituted for [`Expiry::Default`](crate::Expiry::Default) writes.
    /// Zero means those writes never expire.
    pub default_expiry: Duration,
    /// Upper bound on pooled connections.
    pub pool_size: usize,
}

impl Config {
    const DEFAULT_HOST: &str = "127.0.0.1";
    const DEFAULT_PORT: u16 = 6379;
    const DEFAULT_POOL_SIZE: usize = 16;

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let password = std::env::var("REDCACHE_PASSWORD").ok();
        if password.is_none() {
            warn!("REDCACHE_PASSWORD not set, connecting without AUTH");
        }
        Self {
            host: std::env::var("REDCACHE_HOST")
                .unwrap_or_else(|_| Self::DEFAULT_HOST.to_string()),
            port: std::env::var("REDCACHE_PORT")
                .unwrap_or_else(|_| Self::DEFAULT_PORT.to_string())
                .parse::<u16>()
                .unwrap_or(Self::DEFAULT_PORT),
            password,
            database: std::env::var("REDCACHE_DB")
                .unwrap_or_else(|_| "0".to_string())
                .parse::<u32>()
                .unwrap_or(0),
            default_expiry: Duration::from_secs(
                std::env::var("REDCACHE_DEFAULT_TTL_SECS")
                    .unwrap_or_else(|_| "0".to_string())
                    .parse::<u64>()
                    .unwrap_or(0),
            ),
            pool_size: std::env::var("REDCACHE_POOL_SIZE")
                .unwrap_or_else(|_| Self::DEFAULT_POOL_SIZE.to_string())
                .parse::<usize>()
                .unwrap_or(Self::DEFAULT_POOL_SIZE),
        }
    }

    /// Render the `redis://` connection URL. AUTH and SELECT ride in the URL
    /// and run during connection setup; a handshake failure aborts pool
    /// connection creation instead of handing out a broken connection.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.database
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.database),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            password: None,
            database: 0,
            default_expiry: Duration::ZERO,
            pool_size: Self::DEFAULT_POOL_SIZE,
        }
    }
}
