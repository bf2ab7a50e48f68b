//! Service banner.

use axum::response::Json;
use serde::Serialize;

const ENDPOINTS: &[&str] = &[
    "GET    /health",
    "GET    /users",
    "POST   /users",
    "GET    /users/{id}",
    "PUT    /users/{id}",
    "DELETE /users/{id}",
    "GET    /products",
    "POST   /products",
    "GET    /products/{id}",
    "PUT    /products/{id}",
    "DELETE /products/{id}",
    "PATCH  /products/{id}/stock",
];

#[derive(Debug, Serialize)]
pub struct Banner {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

/// Service name, version and the routes it answers.
pub async fn root() -> Json<Banner> {
    Json(Banner {
        name: "Shop Service API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}
