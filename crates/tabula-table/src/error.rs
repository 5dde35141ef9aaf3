//! Error types for table configuration.

use std::path::PathBuf;

use tabula_query::DuplicateColumn;
use thiserror::Error;

/// Errors that can occur while loading or validating a table configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported config format for {} (expected .yaml, .yml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two columns share a key.
    #[error(transparent)]
    DuplicateColumn(#[from] DuplicateColumn),

    /// A visible column is not in the column registry.
    #[error("visible column '{key}' is not a registered column")]
    UnknownColumn { key: String },

    /// `items_per_page` was zero.
    #[error("items_per_page must be at least 1")]
    InvalidItemsPerPage,
}

/// Convenience type alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
