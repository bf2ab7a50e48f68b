//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, RedisError};
use tracing::debug;

use common::{AppResult, CacheConfig};

use super::store::CacheStore;
use crate::infra::{connect_with_retry, BootstrapError, RetryPolicy};

/// Redis cache with a shared, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Connect with bounded retries.
    pub async fn connect(config: &CacheConfig, policy: RetryPolicy) -> Result<Self, BootstrapError> {
        connect_with_retry("redis", policy, || Self::try_connect(&config.url)).await
    }

    /// Single connection attempt followed by a PING.
    pub async fn try_connect(url: &str) -> Result<Self, RedisError> {
        debug!("Connecting to Redis at {}", url);
        let client = Client::open(url)?;
        // Retries are driven by the bootstrapper, not the connection manager
        let manager_config = ConnectionManagerConfig::new().set_number_of_retries(0);
        let mut connection = ConnectionManager::new_with_config(client, manager_config).await?;

        let _: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        let mut conn = self.connection.clone();
        // SET EX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection.clone();
        conn.del::<_, ()>(keys).await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
