//! Pagination types for list endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::Task;

/// Page number and size taken from the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u64,
    pub limit: u64,
}

impl PaginationParams {
    /// Parse leniently: anything missing, unparsable or below 1 falls back
    /// to the defaults, and the page size is capped at `MAX_PAGE_SIZE`.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE_NUMBER);
        let limit = parse_positive(limit)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        Self { page, limit }
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v >= 1)
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(PaginatedTasks = Paginated<Task>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub limit: u64,
    #[schema(example = 42)]
    pub total: u64,
    #[schema(example = 5)]
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// `total_pages` is `ceil(total / limit)`, 0 for an empty result.
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        let total_pages = if params.limit > 0 {
            total.div_ceil(params.limit)
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page: params.page,
                limit: params.limit,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let params = PaginationParams::from_query(None, None);
        assert_eq!(params, PaginationParams::default());
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_garbage_and_non_positive_values_fall_back() {
        let params = PaginationParams::from_query(Some("abc"), Some("0"));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);

        let params = PaginationParams::from_query(Some("-3"), Some("-1"));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
    }

    #[test]
    fn test_limit_is_capped() {
        let params = PaginationParams::from_query(Some("2"), Some("5000"));
        assert_eq!(params.limit, MAX_PAGE_SIZE);
        assert_eq!(params.offset(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_follows_page() {
        let params = PaginationParams::from_query(Some("3"), Some("10"));
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let params = PaginationParams { page: 1, limit: 10 };

        assert_eq!(Paginated::<()>::new(vec![], params, 0).meta.total_pages, 0);
        assert_eq!(Paginated::<()>::new(vec![], params, 10).meta.total_pages, 1);
        assert_eq!(Paginated::<()>::new(vec![], params, 11).meta.total_pages, 2);
    }
}
