//! Bounded startup retry with linear backoff.
//!
//! Attempt `n` that fails is followed by a pause of `n * backoff_unit`
//! before attempt `n + 1`. No jitter, no exponential growth.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use common::RetryConfig;

/// Fatal startup errors. The service must not accept traffic after one of
/// these.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to connect to {target} after {attempts} attempts: {last_error}")]
    Exhausted {
        target: &'static str,
        attempts: u32,
        last_error: String,
    },

    #[error("failed to prepare database schema: {0}")]
    Schema(#[from] sea_orm::DbErr),
}

/// How often and how patiently to retry a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Policy for the relational store (5 attempts by default)
    pub fn database(config: &RetryConfig) -> Self {
        Self::new(
            config.database_attempts,
            Duration::from_millis(config.backoff_unit_ms),
        )
    }

    /// Policy for the cache (3 attempts by default)
    pub fn cache(config: &RetryConfig) -> Self {
        Self::new(
            config.cache_attempts,
            Duration::from_millis(config.backoff_unit_ms),
        )
    }

    /// Pause after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }
}

/// Call `connect` until it succeeds or the policy runs out of attempts.
pub async fn connect_with_retry<T, E, F, Fut>(
    target: &'static str,
    policy: RetryPolicy,
    mut connect: F,
) -> Result<T, BootstrapError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        match connect().await {
            Ok(value) => {
                info!(dependency = target, attempt, "Connected");
                return Ok(value);
            }
            Err(e) => {
                warn!(dependency = target, attempt, error = %e, "Connection attempt failed");
                last_error = e.to_string();

                if attempt < policy.max_attempts {
                    sleep(policy.delay_after(attempt)).await;
                }
            }
        }
    }

    Err(BootstrapError::Exhausted {
        target,
        attempts: policy.max_attempts,
        last_error,
    })
}
