//! Route handlers grouped by resource.

pub mod health_handler;
pub mod product_handler;
pub mod root_handler;
pub mod user_handler;

pub use health_handler::health_routes;
pub use product_handler::product_routes;
pub use root_handler::root;
pub use user_handler::user_routes;

use common::{AppError, AppResult};

/// Parse a path id, rejecting anything that is not a positive integer.
fn parse_id(raw: &str, entity: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::bad_request(format!("Invalid {} ID", entity)))
}
