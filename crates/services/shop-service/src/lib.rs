//! Shop Service Library
//!
//! Users and products behind a cache-aside layer: PostgreSQL is the store of
//! record, Redis holds short-lived copies of entities and list pages.

pub mod cache;
pub mod config;
pub mod deadline;
pub mod http;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::cache::{CacheAside, CacheStore, RedisCache};
use crate::config::ShopServiceConfig;
use crate::http::{create_router, AppState};
use crate::infra::{Database, RetryPolicy};
use crate::repository::{ProductStore, UserStore};
use crate::service::{ProductManager, UserManager};

/// Bootstrap both stores and serve HTTP until SIGINT or SIGTERM.
///
/// Fails before binding the listener if either store stays unreachable
/// after its retries.
pub async fn run_server(
    host: &str,
    port: u16,
    config: ShopServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        service = %config.service.service_name,
        env = %config.service.app_env,
        "Starting server"
    );

    let db = Database::connect(&config.database, RetryPolicy::database(&config.retry)).await?;
    let redis = RedisCache::connect(&config.cache, RetryPolicy::cache(&config.retry)).await?;

    let state = build_state(db, Arc::new(redis), &config);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Shop service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Connect to the database, create missing tables and exit.
pub async fn init_schema(config: ShopServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    Database::connect(&config.database, RetryPolicy::database(&config.retry)).await?;
    info!("Schema is up to date");
    Ok(())
}

/// Wire repositories, cache and services into the router state.
pub fn build_state(
    db: Database,
    cache: Arc<dyn CacheStore>,
    config: &ShopServiceConfig,
) -> AppState {
    let cache_aside = CacheAside::new(cache.clone(), config.cache.ttl());
    let timeout = config.service.request_timeout();

    let users = Arc::new(UserManager::new(
        Arc::new(UserStore::new(db.get_connection())),
        cache_aside.clone(),
        timeout,
    ));
    let products = Arc::new(ProductManager::new(
        Arc::new(ProductStore::new(db.get_connection())),
        cache_aside,
        timeout,
    ));

    AppState::new(users, products, db, cache, timeout)
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
