//! Key-value cache contract.

use std::time::Duration;

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Key-value store with per-entry TTL.
///
/// Values are opaque strings; encoding entities is the caller's job.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value, `None` on miss or expiry
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write a value that expires after `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()>;

    /// Remove keys; missing keys are ignored
    async fn delete(&self, keys: &[String]) -> AppResult<()>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;
}
