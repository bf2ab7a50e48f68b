//! Deterministic cache key layout for entity kinds.

use crate::constants::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::pagination::PageRequest;

/// Entity kinds that can be cached by id and by list page.
///
/// Keys look like `user:42` and `users:list:1:10`.
pub trait Cacheable {
    /// Prefix for single-entity keys
    const ENTITY_PREFIX: &'static str;
    /// Prefix for list page keys
    const LIST_PREFIX: &'static str;

    /// Key for one entity
    fn entity_key(id: i32) -> String {
        format!("{}:{}", Self::ENTITY_PREFIX, id)
    }

    /// Key for one list page
    fn list_key(request: &PageRequest) -> String {
        format!(
            "{}:{}:{}",
            Self::LIST_PREFIX,
            request.page(),
            request.limit()
        )
    }

    /// List pages dropped after any write to this kind.
    ///
    /// Only the first page at the default and the maximum page size is
    /// targeted. Other pages stay cached until their TTL expires.
    fn list_invalidation_keys() -> Vec<String> {
        [DEFAULT_LIMIT, MAX_LIMIT]
            .into_iter()
            .map(|limit| {
                format!("{}:{}:{}", Self::LIST_PREFIX, DEFAULT_PAGE, limit)
            })
            .collect()
    }

    /// Keys dropped after a write to the entity with `id`.
    fn invalidation_keys(id: i32) -> Vec<String> {
        let mut keys = vec![Self::entity_key(id)];
        keys.extend(Self::list_invalidation_keys());
        keys
    }
}
