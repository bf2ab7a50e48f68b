//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, MAX_PAGE};

/// A page request with bounds already applied.
///
/// The only way to build one is [`PageRequest::normalize`], so a value of this
/// type always has `1 <= page <= MAX_PAGE` and `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Clamp raw query values into a valid page request.
    ///
    /// A missing or non-positive page becomes page 1 and a page past
    /// `MAX_PAGE` is clamped to it. A missing limit, or one outside
    /// `1..=MAX_LIMIT`, falls back to the default page size rather than being
    /// clamped to the maximum.
    pub fn normalize(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => (p as u64).min(MAX_PAGE),
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l >= 1 && l as u64 <= MAX_LIMIT => l as u64,
            _ => DEFAULT_LIMIT,
        };

        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Raw pagination query parameters as sent by clients.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<PaginationParams> for PageRequest {
    fn from(params: PaginationParams) -> Self {
        PageRequest::normalize(params.page, params.limit)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::ToSchema),
    aliases(
        PaginatedUsers = Paginated<crate::user::User>,
        PaginatedProducts = Paginated<crate::product::Product>
    )
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(request.limit());

        Self {
            data,
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let req = PageRequest::normalize(Some(0), Some(0));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_oversized_limit_falls_back_to_default() {
        let req = PageRequest::normalize(Some(2), Some(500));
        assert_eq!(req.page(), 2);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 10);
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(PageRequest::normalize(None, None), PageRequest::default());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let req = PageRequest::normalize(Some(3), Some(100));
        assert_eq!(req.limit(), 100);
        assert_eq!(req.offset(), 200);

        let req = PageRequest::normalize(Some(-4), Some(1));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 1);
    }

    #[test]
    fn test_huge_page_is_clamped_and_offset_fits_bigint() {
        let req = PageRequest::normalize(Some(i64::MAX), Some(100));
        assert_eq!(req.page(), MAX_PAGE);
        assert!(req.offset() <= i64::MAX as u64);

        let req = PageRequest::normalize(Some(i64::MAX), Some(1));
        assert!(req.offset() <= i64::MAX as u64);
    }

    #[test]
    fn test_paginated_json_round_trip() {
        let page = Paginated::new(vec![1, 2], PageRequest::normalize(Some(2), Some(2)), 4);
        let json = serde_json::to_string(&page).unwrap();
        let decoded: Paginated<i32> = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.data, vec![1, 2]);
        assert_eq!(decoded.page, 2);
        assert_eq!(decoded.total_pages, 2);
    }

    #[test]
    fn test_paginated_total_pages() {
        let page = Paginated::new(vec![1, 2, 3], PageRequest::normalize(Some(1), Some(3)), 7);
        assert_eq!(page.total_pages, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 0);
    }
}
