//! Query results and the diagnostics that travel with them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A non-fatal problem noticed while running a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A filter referenced a field outside the column registry; it matched nothing.
    UnknownFilterField { field: String },
    /// A free-text search ran with no searchable columns registered; it matched nothing.
    NoSearchableColumns,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownFilterField { field } => {
                write!(f, "filter on unknown field '{}' matches no records", field)
            }
            Diagnostic::NoSearchableColumns => {
                f.write_str("search term ignored: no searchable columns are registered")
            }
        }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Records in the requested window, at most `limit` of them.
    pub records: Vec<Record>,
    /// Number of records that passed search and filtering, before pagination.
    pub total: usize,
    /// Warnings collected while running the query.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl QueryResult {
    /// Returns `true` if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Ids of the records on this page, in page order.
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().filter_map(Record::id).collect()
    }

    /// Returns `true` if any diagnostics were recorded.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
