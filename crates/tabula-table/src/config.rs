//! Table configuration loading.
//!
//! A table configuration document declares the column registry and the
//! presentation options together:
//!
//! ```yaml
//! columns:
//!   - key: name
//!     label: Name
//!   - key: created_at
//!     label: Created
//!     kind: date
//!     searchable: false
//! presentation:
//!   visible_columns: [name, created_at]
//!   items_per_page: 25
//!   pagination_position: both
//!   density: compact
//!   row_selection_enabled: true
//! ```
//!
//! The `presentation` section is optional. YAML and JSON are both accepted;
//! [`TableConfig::load`] picks the format from the file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabula_query::{ColumnDescriptor, ColumnRegistry};

use crate::error::{ConfigError, Result};
use crate::presentation::TablePresentationConfig;

/// A validated column registry plus presentation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableConfig {
    pub columns: ColumnRegistry,
    pub presentation: TablePresentationConfig,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTableConfig {
    columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    presentation: TablePresentationConfig,
}

impl TableConfig {
    /// Builds and validates a configuration.
    pub fn new(
        columns: impl IntoIterator<Item = ColumnDescriptor>,
        presentation: TablePresentationConfig,
    ) -> Result<Self> {
        let columns = ColumnRegistry::new(columns)?;
        presentation.validate(&columns)?;
        Ok(TableConfig {
            columns,
            presentation,
        })
    }

    /// Loads a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, has an
    /// unsupported extension, fails to parse, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("yaml" | "yml") => TableConfig::from_yaml_str,
            Some("json") => TableConfig::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            columns = config.columns.len(),
            "loaded table config"
        );
        Ok(config)
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: RawTableConfig = serde_yaml::from_str(yaml)?;
        TableConfig::new(raw.columns, raw.presentation)
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawTableConfig = serde_json::from_str(json)?;
        TableConfig::new(raw.columns, raw.presentation)
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{Density, PaginationPosition};
    use tabula_query::ColumnKind;

    const USERS_YAML: &str = r#"
columns:
  - key: id
    label: ID
    searchable: false
  - key: name
    label: Name
  - key: created_at
    display_label: Created
    kind: date
    searchable_by_free_text: false
presentation:
  visible_columns: [name, created_at]
  items_per_page: 25
  pagination_position: both
  density: compact
  row_selection_enabled: true
"#;

    #[test]
    fn parses_full_yaml() {
        let config = TableConfig::from_yaml_str(USERS_YAML).unwrap();

        assert_eq!(config.columns.len(), 3);
        let created = config.columns.get("created_at").unwrap();
        assert_eq!(created.label, "Created");
        assert_eq!(created.kind, ColumnKind::Date);
        assert!(!created.searchable);
        assert!(created.sortable);
        assert_eq!(config.columns.searchable_keys(), vec!["name"]);

        let p = &config.presentation;
        assert_eq!(p.items_per_page, 25);
        assert_eq!(p.pagination_position, PaginationPosition::Both);
        assert_eq!(p.density, Density::Compact);
        assert!(p.row_selection_enabled);
    }

    #[test]
    fn presentation_is_optional() {
        let config = TableConfig::from_yaml_str("columns:\n  - key: name\n").unwrap();
        assert_eq!(config.presentation, TablePresentationConfig::default());
        assert_eq!(config.columns.get("name").unwrap().display_label(), "name");
    }

    #[test]
    fn parses_json() {
        let config = TableConfig::from_json_str(
            r#"{"columns": [{"key": "name", "label": "Name", "sortable": false}],
                "presentation": {"items_per_page": 5}}"#,
        )
        .unwrap();
        assert!(!config.columns.is_sortable("name"));
        assert_eq!(config.presentation.items_per_page, 5);
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = TableConfig::from_yaml_str("columns:\n  - key: name\n  - key: name\n").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateColumn(_)));
    }

    #[test]
    fn rejects_unknown_visible_column() {
        let err = TableConfig::from_yaml_str(
            "columns:\n  - key: name\npresentation:\n  visible_columns: [name, email]\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn { key } if key == "email"));
    }

    #[test]
    fn rejects_zero_items_per_page() {
        let err = TableConfig::from_yaml_str(
            "columns:\n  - key: name\npresentation:\n  items_per_page: 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidItemsPerPage));
    }

    #[test]
    fn rejects_unknown_density() {
        let err = TableConfig::from_yaml_str(
            "columns:\n  - key: name\npresentation:\n  density: cramped\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_round_trip() {
        let config = TableConfig::from_yaml_str(USERS_YAML).unwrap();
        let again = TableConfig::from_yaml_str(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(config, again);
    }
}
