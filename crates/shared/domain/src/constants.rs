//! Domain-level constants.
//!
//! These constants define business rules, pagination bounds and cache key
//! layout shared by every entity kind.

// =============================================================================
// Pagination
// =============================================================================

/// Page used when the caller omits it or sends a value below 1
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the caller omits it or sends an out-of-range value
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest accepted page size
pub const MAX_LIMIT: u64 = 100;

/// Largest accepted page; keeps `(page - 1) * limit` within a Postgres bigint
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT + 1;

// =============================================================================
// Cache keys
// =============================================================================

/// Key prefix for a single cached user
pub const CACHE_PREFIX_USER: &str = "user";

/// Key prefix for cached user list pages
pub const CACHE_PREFIX_USER_LIST: &str = "users:list";

/// Key prefix for a single cached product
pub const CACHE_PREFIX_PRODUCT: &str = "product";

/// Key prefix for cached product list pages
pub const CACHE_PREFIX_PRODUCT_LIST: &str = "products:list";
