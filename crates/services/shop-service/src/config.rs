//! Shop service configuration.

use std::env;
use std::str::FromStr;

use common::{CacheConfig, DatabaseConfig, RetryConfig, ServiceConfig};

/// Shop service configuration.
#[derive(Debug, Clone, Default)]
pub struct ShopServiceConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
}

impl ShopServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service: ServiceConfig {
                service_name: defaults.service.service_name,
                app_env: env::var("APP_ENV").unwrap_or(defaults.service.app_env),
                host: env::var("SHOP_SERVICE_HOST").unwrap_or(defaults.service.host),
                port: parse_var("SHOP_SERVICE_PORT", defaults.service.port),
                request_timeout_ms: parse_var(
                    "REQUEST_TIMEOUT_MS",
                    defaults.service.request_timeout_ms,
                ),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_var("DB_MAX_CONNS", defaults.database.max_connections),
                min_connections: parse_var("DB_MIN_CONNS", defaults.database.min_connections),
                max_lifetime_seconds: parse_var(
                    "DB_CONN_MAX_LIFETIME_SECS",
                    defaults.database.max_lifetime_seconds,
                ),
                connect_timeout_seconds: defaults.database.connect_timeout_seconds,
            },
            cache: CacheConfig {
                url: env::var("REDIS_URL").unwrap_or(defaults.cache.url),
                default_ttl_seconds: parse_var(
                    "CACHE_TTL_SECS",
                    defaults.cache.default_ttl_seconds,
                ),
            },
            retry: defaults.retry,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
