//! Error types for record repositories.

use tabula_query::{QueryError, ID_FIELD};
use thiserror::Error;

/// Errors that can occur when reading or writing a repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record '{id}' not found")]
    NotFound { id: String },

    #[error("record '{id}' already exists")]
    DuplicateId { id: String },

    #[error("record has no '{}' field", ID_FIELD)]
    MissingId,

    /// An update tried to change a record's id.
    #[error("cannot change id of record '{id}' to '{attempted}'")]
    IdImmutable { id: String, attempted: String },

    /// A writer panicked while holding a repository lock.
    #[error("repository lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Convenience type alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
