//! Infrastructure layer - connection bootstrap for the database and cache.

mod db;
mod retry;

pub use db::Database;
pub use retry::{connect_with_retry, BootstrapError, RetryPolicy};
