//! Offset pagination for list queries.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest page a single query may return.
pub const MAX_LIMIT: i64 = 1000;

/// Page size used when the caller does not specify one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Limit and offset applied to a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Pagination {
    /// Maximum number of rows to return, within `1..=MAX_LIMIT`.
    pub limit: i64,
    /// Rows to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates pagination, clamping out-of-range values.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_values() {
        let pagination = Pagination::new(5000, -3);
        assert_eq!(pagination.limit, MAX_LIMIT);
        assert_eq!(pagination.offset, 0);
        assert_eq!(Pagination::new(0, 0).limit, 1);
    }

    #[test]
    fn defaults_to_first_page() {
        let pagination = Pagination::default();
        assert_eq!(pagination.limit, DEFAULT_LIMIT);
        assert_eq!(pagination.offset, 0);
    }
}
