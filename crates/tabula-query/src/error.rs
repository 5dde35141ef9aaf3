//! Error types for the query crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that fail a whole query.
///
/// Data conditions (unknown filter fields, empty condition values, pages past
/// the end) are not errors; they surface as [`Diagnostic`](crate::Diagnostic)s
/// or empty pages instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Operator string outside the recognized set.
    #[error("invalid operator '{operator}' on field '{field}'")]
    InvalidOperator { operator: String, field: String },

    /// Sort requested on a column that is unknown or not sortable.
    #[error("column '{field}' is not sortable")]
    NotSortable { field: String },

    /// The caller's cancellation token fired.
    #[error("query cancelled")]
    Cancelled,

    /// The caller's deadline passed before the query finished.
    #[error("query deadline exceeded after {elapsed:?}")]
    DeadlineExceeded { elapsed: Duration },
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
