//! Offset pagination query parameters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::query::Pagination as QueryPagination;
use uniteam_postgres::types::DEFAULT_LIMIT;

/// `offset` and `limit` query parameters accepted by every list endpoint.
///
/// Missing values default to `0` and `50`; the limit is clamped to
/// `1..=1000`.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct Pagination {
    /// Number of records to skip.
    pub offset: Option<u32>,
    /// Maximum number of records to return.
    pub limit: Option<u32>,
}

impl Pagination {
    #[inline]
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset.map_or(0, i64::from)
    }

    pub fn limit(&self) -> i64 {
        self.limit.map_or(DEFAULT_LIMIT, i64::from)
    }
}

impl From<Pagination> for QueryPagination {
    fn from(pagination: Pagination) -> Self {
        QueryPagination::new(pagination.limit(), pagination.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        let pagination = QueryPagination::from(Pagination::default());
        assert_eq!((pagination.offset, pagination.limit), (0, 50));

        let pagination = QueryPagination::from(Pagination::new(20, 5000));
        assert_eq!((pagination.offset, pagination.limit), (20, 1000));

        let pagination = QueryPagination::from(Pagination::new(0, 0));
        assert_eq!(pagination.limit, 1);
    }
}
