//! Per-request deadline shared by every store and cache call of a request.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use common::{AppError, AppResult};

/// Point in time after which outstanding I/O for a request is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// Run a store call, failing with [`AppError::Timeout`] once the deadline
    /// passes.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, "Deadline exceeded");
                Err(AppError::timeout(operation))
            }
        }
    }

    /// Run a call whose timeout is handled by the caller.
    ///
    /// Returns `None` if the deadline passed first.
    pub async fn within<T, F>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        timeout_at(self.at, fut).await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let deadline = Deadline::after(Duration::from_secs(1));
        let value = tokio_test::assert_ok!(deadline.run("noop", async { Ok(7) }).await);
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let deadline = Deadline::after(Duration::from_millis(10));
        let result: AppResult<()> = deadline
            .run("slow query", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_within_gives_up_after_deadline() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline
            .within(tokio::time::sleep(Duration::from_millis(50)))
            .await
            .is_none());
    }
}
