//! Application state for dependency injection.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::infra::Database;
use crate::service::{ProductService, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub products: Arc<dyn ProductService>,
    /// Held for health checks only; handlers go through the services
    pub database: Database,
    pub cache: Arc<dyn CacheStore>,
    /// Bounds the health pings, like any other request
    pub request_timeout: Duration,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        users: Arc<dyn UserService>,
        products: Arc<dyn ProductService>,
        database: Database,
        cache: Arc<dyn CacheStore>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            users,
            products,
            database,
            cache,
            request_timeout,
        }
    }
}
