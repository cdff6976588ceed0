//! Redis-backed key-value store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::repositories::{KeyValueStore, StoreError, StoreResult};

/// Connection attempts made at startup before giving up.
const CONNECT_ATTEMPTS: usize = 3;

/// Redis store shared by every service instance.
///
/// Uses `ConnectionManager` for automatic reconnection. Unlike a cache, errors
/// are returned to the caller: the rotation core decides per call site whether
/// a failure is swallowed or surfaced.
pub struct RedisStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// Transient connection failures are retried with jittered exponential
    /// backoff.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - namespace prepended to every key
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid or every
    /// connection attempt fails.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> StoreResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Unavailable(format!("Invalid Redis URL: {}", e)))?;

        let strategy = ExponentialBackoff::from_millis(100)
            .map(jitter)
            .take(CONNECT_ATTEMPTS - 1);

        let manager = Retry::spawn(strategy, || {
            let client = client.clone();
            async move {
                let manager = ConnectionManager::new(client).await.map_err(|e| {
                    warn!("Redis connection attempt failed: {}", e);
                    StoreError::Unavailable(format!("Failed to connect to Redis: {}", e))
                })?;

                let mut conn = manager.clone();
                conn
                    .ping::<()>()
                    .await
                    .map_err(|e| StoreError::Unavailable(format!("Redis PING failed: {}", e)))?;

                Ok::<_, StoreError>(manager)
            }
        })
        .await?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.into(),
        })
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(&full_key)
            .await
            .map_err(|e| StoreError::Unavailable(format!("GET {}: {}", full_key, e)))?;

        debug!(key = %full_key, hit = value.is_some(), "Store GET");
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&full_key, value)
            .await
            .map_err(|e| StoreError::Unavailable(format!("SET {}: {}", full_key, e)))?;

        debug!(key = %full_key, bytes = value.len(), "Store SET");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
