//! Column registry: which fields exist, and how they may be searched and sorted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a column's values are ordered when sorting.
///
/// Filtering always uses string semantics; the kind only changes sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Case-insensitive lexicographic order.
    #[default]
    Text,
    /// Numeric order; unparseable values sort after numbers.
    Numeric,
    /// Chronological order of RFC 3339 date-times or `YYYY-MM-DD` dates.
    Date,
}

impl ColumnKind {
    /// Returns the config name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Date => "date",
        }
    }
}

fn default_true() -> bool {
    true
}

/// A registered column.
///
/// Columns are sortable and searchable unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Record field name.
    pub key: String,
    /// Human-readable header label.
    #[serde(default, alias = "display_label")]
    pub label: String,
    /// Whether the column can be used as a sort key.
    #[serde(default = "default_true")]
    pub sortable: bool,
    /// Whether the column participates in free-text search.
    #[serde(default = "default_true", alias = "searchable_by_free_text")]
    pub searchable: bool,
    /// Value kind, used for sorting.
    #[serde(default)]
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Creates a sortable, searchable text column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        ColumnDescriptor {
            key: key.into(),
            label: label.into(),
            sortable: true,
            searchable: true,
            kind: ColumnKind::Text,
        }
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column takes part in free-text search.
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Sets the column kind.
    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Header label, falling back to the key when no label is set.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// Two registry entries share a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate column key '{key}'")]
pub struct DuplicateColumn {
    /// The repeated key.
    pub key: String,
}

/// Ordered set of column descriptors, keyed by field name.
///
/// Static configuration: built once at startup and shared by every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnDescriptor>", into = "Vec<ColumnDescriptor>")]
pub struct ColumnRegistry {
    columns: Vec<ColumnDescriptor>,
    index: HashMap<String, usize>,
}

impl ColumnRegistry {
    /// Builds a registry, rejecting duplicate keys.
    pub fn new(
        columns: impl IntoIterator<Item = ColumnDescriptor>,
    ) -> std::result::Result<Self, DuplicateColumn> {
        let mut registry = ColumnRegistry::default();
        for column in columns {
            if registry.index.contains_key(&column.key) {
                return Err(DuplicateColumn { key: column.key });
            }
            registry
                .index
                .insert(column.key.clone(), registry.columns.len());
            registry.columns.push(column);
        }
        Ok(registry)
    }

    /// Looks up a column by key.
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.index.get(key).map(|&i| &self.columns[i])
    }

    /// Returns `true` if the key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns `true` if the key is registered and sortable.
    pub fn is_sortable(&self, key: &str) -> bool {
        self.get(key).is_some_and(|c| c.sortable)
    }

    /// Keys of the columns that take part in free-text search, in order.
    pub fn searchable_keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.searchable)
            .map(|c| c.key.as_str())
            .collect()
    }

    /// All keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    /// All descriptors in registration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Number of registered columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no columns are registered.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TryFrom<Vec<ColumnDescriptor>> for ColumnRegistry {
    type Error = DuplicateColumn;

    fn try_from(columns: Vec<ColumnDescriptor>) -> std::result::Result<Self, Self::Error> {
        ColumnRegistry::new(columns)
    }
}

impl From<ColumnRegistry> for Vec<ColumnDescriptor> {
    fn from(registry: ColumnRegistry) -> Self {
        registry.columns
    }
}
