//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::deadline::Deadline;
use crate::http::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub services: ServiceStatus,
}

/// Individual service status.
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub postgres: ServiceHealth,
    pub redis: ServiceHealth,
}

/// Service health with optional error message.
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// `None` means the ping did not answer before the deadline.
    fn from_ping<E: std::fmt::Display>(ping: Option<Result<(), E>>) -> Self {
        let error = match ping {
            Some(Ok(())) => None,
            Some(Err(e)) => Some(e.to_string()),
            None => Some("timed out".to_string()),
        };

        Self {
            status: if error.is_none() { "healthy" } else { "unhealthy" }.to_string(),
            error,
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - pings the database and Redis.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable"),
        (status = 503, description = "At least one dependency unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let deadline = Deadline::after(state.request_timeout);
    let (postgres, redis) = tokio::join!(
        deadline.within(state.database.ping()),
        deadline.within(state.cache.ping())
    );

    let postgres = ServiceHealth::from_ping(postgres);
    let redis = ServiceHealth::from_ping(redis);
    let all_healthy = postgres.is_healthy() && redis.is_healthy();

    if !all_healthy {
        tracing::warn!(?postgres, ?redis, "Health check degraded");
    }

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        timestamp: Utc::now(),
        services: ServiceStatus { postgres, redis },
    };

    let status = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response)).into_response()
}
