//! Service layer: cache-aside reads and invalidate-on-write per entity kind.

mod product_service;
mod user_service;

pub use product_service::{ProductManager, ProductService};
pub use user_service::{UserManager, UserService};
