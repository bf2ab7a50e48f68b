//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user and product entities, their input types, pagination bounds and
//! the cache key layout shared by the service.

pub mod cache_key;
pub mod constants;
pub mod error;
pub mod pagination;
pub mod product;
pub mod user;

pub use cache_key::Cacheable;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use pagination::{PageRequest, Paginated, PaginationParams};
#[cfg(feature = "openapi")]
pub use pagination::{PaginatedProducts, PaginatedUsers};
pub use product::{CreateProduct, Product, StockUpdate, UpdateProduct};
pub use user::{CreateUser, UpdateUser, User};
