//! Cache layer: a shape-agnostic key-value store and the cache-aside helper
//! the services use on top of it.

mod cache_aside;
mod redis_cache;
mod store;

pub use cache_aside::CacheAside;
pub use redis_cache::RedisCache;
pub use store::CacheStore;

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockCacheStore;
