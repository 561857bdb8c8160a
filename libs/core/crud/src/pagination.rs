use axum_helpers::PaginationMeta;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 25;
pub const MAX_LIMIT: u64 = 100;
/// Largest offset MongoDB accepts (`skip` is a signed 64-bit integer)
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// `?page=&limit=` on list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// 1-based page number
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: Option<u64>,
    /// Page size, at most 100
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Fills in `limit` when the client left it out.
    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.limit.get_or_insert(limit);
        self
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Pages past the addressable range land on an empty window.
    pub fn skip(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit()).min(MAX_SKIP)
    }
}

/// One page of a collection plus the total matching count.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> PaginatedResult<T> {
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta::new(self.page, self.limit, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = PaginationQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert_eq!(query.skip(), 0);
    }

    #[test]
    fn test_skip() {
        assert_eq!(PaginationQuery::new(3, 10).skip(), 20);
        assert_eq!(PaginationQuery::new(1, 100).skip(), 0);
    }

    #[test]
    fn test_skip_is_capped_for_huge_pages() {
        assert_eq!(PaginationQuery::new(1 << 62, 100).skip(), MAX_SKIP);
        assert_eq!(PaginationQuery::new(u64::MAX, 1).skip(), MAX_SKIP);
        assert!(PaginationQuery::new(1 << 62, 100).validate().is_ok());
    }

    #[test]
    fn test_default_limit_only_fills_missing_limit() {
        let query = PaginationQuery {
            page: Some(2),
            limit: None,
        }
        .with_default_limit(10);
        assert_eq!(query.limit, Some(10));

        let query = PaginationQuery::new(1, 50).with_default_limit(10);
        assert_eq!(query.limit, Some(50));
    }

    #[test]
    fn test_validation_bounds() {
        assert!(PaginationQuery::new(1, 1).validate().is_ok());
        assert!(PaginationQuery::new(1, 100).validate().is_ok());
        assert!(PaginationQuery::new(0, 10).validate().is_err());
        assert!(PaginationQuery::new(1, 0).validate().is_err());
        assert!(PaginationQuery::new(1, 101).validate().is_err());
        assert!(PaginationQuery::default().validate().is_ok());
    }

    #[test]
    fn test_meta_from_result() {
        let result = PaginatedResult {
            items: vec![1; 10],
            total: 25,
            page: 1,
            limit: 10,
        };
        assert_eq!(result.meta(), PaginationMeta::new(1, 10, 25));
        assert_eq!(result.meta().total_pages, 3);
    }
}
