//! Cache-aside helper.
//!
//! Every cache failure (transport error, timeout, undecodable value) is
//! logged and absorbed here. Callers only ever see a hit or a miss, so the
//! cache can never turn a request into an error.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::store::CacheStore;
use crate::deadline::Deadline;

/// Budget for invalidating after a write, independent of the request's own
const INVALIDATION_TIMEOUT: Duration = Duration::from_secs(1);

/// Typed, best-effort view over a [`CacheStore`].
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Read and decode a cached value. Anything but a clean hit is a miss.
    pub async fn fetch<T: DeserializeOwned>(&self, deadline: &Deadline, key: &str) -> Option<T> {
        let raw = match deadline.within(self.store.get(key)).await {
            Some(Ok(Some(raw))) => raw,
            Some(Ok(None)) => {
                debug!(key, "Cache miss");
                return None;
            }
            Some(Err(e)) => {
                warn!(key, error = %e, "Cache read failed, falling back to store");
                return None;
            }
            None => {
                warn!(key, "Cache read timed out, falling back to store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to decode cached value, treating as miss");
                None
            }
        }
    }

    /// Encode and cache a value read from the store.
    pub async fn store<T: Serialize>(&self, deadline: &Deadline, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode value for cache");
                return;
            }
        };

        match deadline.within(self.store.set(key, json, self.ttl)).await {
            Some(Ok(())) => debug!(key, ttl_secs = self.ttl.as_secs(), "Cached"),
            Some(Err(e)) => warn!(key, error = %e, "Cache write failed"),
            None => warn!(key, "Cache write timed out"),
        }
    }

    /// Drop keys after a committed store write.
    ///
    /// Runs under its own deadline so a slow write cannot starve it. Failures
    /// leave stale entries behind until their TTL expires.
    pub async fn invalidate(&self, keys: &[String]) {
        let deadline = Deadline::after(INVALIDATION_TIMEOUT);
        match deadline.within(self.store.delete(keys)).await {
            Some(Ok(())) => debug!(?keys, "Cache invalidated"),
            Some(Err(e)) => warn!(?keys, error = %e, "Cache invalidation failed"),
            None => warn!(?keys, "Cache invalidation timed out"),
        }
    }
}
