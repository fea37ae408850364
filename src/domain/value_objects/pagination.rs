//! # Pagination
//!
//! Page window and sort direction accepted by every repository `query`.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::value_objects::pagination::Pagination;
//!
//! let page = Pagination::new(50, 100).unwrap();
//! assert_eq!(page.limit(), 50);
//! assert!(Pagination::new(0, 0).is_err());
//! assert!(Pagination::new(1001, 0).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default page size.
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page a query may request.
pub const MAX_LIMIT: usize = 1000;

/// Direction applied to a query's sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// A validated `limit`/`offset` window.
///
/// # Invariants
///
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    limit: usize,
    offset: usize,
}

impl Pagination {
    /// Creates a page window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `limit` is zero or above [`MAX_LIMIT`].
    pub fn new(limit: usize, offset: usize) -> DomainResult<Self> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(DomainError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {limit}"
            )));
        }
        Ok(Self { limit, offset })
    }

    /// Maximum number of items returned.
    #[inline]
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of items skipped.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Applies the window to an already sorted list.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
