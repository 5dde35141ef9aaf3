//! Presentation options applied to a query result before display.
//!
//! The query engine never reads these options. The caller derives a
//! [`PageSpec`] from them and uses them to shape a [`QueryResult`] into
//! a [`TableView`](crate::TableView).
//!
//! [`QueryResult`]: tabula_query::QueryResult

use serde::{Deserialize, Serialize};
use tabula_query::{ColumnDescriptor, ColumnRegistry, PageSpec, DEFAULT_LIMIT};

use crate::error::{ConfigError, Result};

/// Where pagination controls are shown relative to the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationPosition {
    /// Above the table only.
    Top,
    /// Below the table only.
    #[default]
    Bottom,
    /// Above and below the table.
    Both,
    /// Pagination controls are hidden.
    None,
}

impl PaginationPosition {
    /// Returns true if controls appear above the table.
    pub fn shows_top(self) -> bool {
        matches!(self, PaginationPosition::Top | PaginationPosition::Both)
    }

    /// Returns true if controls appear below the table.
    pub fn shows_bottom(self) -> bool {
        matches!(self, PaginationPosition::Bottom | PaginationPosition::Both)
    }
}

/// Row spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// Rows packed tightly, single-space column gap.
    Compact,
    /// Default spacing.
    #[default]
    Normal,
    /// A blank line between rows and wide column gaps.
    Spacious,
}

impl Density {
    /// Blank lines inserted between rows.
    pub fn row_padding(self) -> usize {
        match self {
            Density::Compact | Density::Normal => 0,
            Density::Spacious => 1,
        }
    }

    /// Spaces between adjacent columns.
    pub fn column_gap(self) -> usize {
        match self {
            Density::Compact => 1,
            Density::Normal => 2,
            Density::Spacious => 4,
        }
    }
}

/// Recognized table presentation options.
///
/// # Example
///
/// ```rust
/// use tabula_query::{ColumnDescriptor, ColumnRegistry};
/// use tabula_table::TablePresentationConfig;
///
/// let registry = ColumnRegistry::new([
///     ColumnDescriptor::new("name", "Name"),
///     ColumnDescriptor::new("email", "Email"),
/// ])
/// .unwrap();
///
/// let mut config = TablePresentationConfig::default().items_per_page(25);
/// config.toggle_column("email", &registry).unwrap();
///
/// let visible: Vec<_> = config.visible(&registry).iter().map(|c| c.key.as_str()).collect();
/// assert_eq!(visible, vec!["name"]);
/// assert_eq!(config.page_spec(3).offset, 50);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePresentationConfig {
    /// Column keys to display. `None` shows every registered column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_columns: Option<Vec<String>>,
    /// Page size; becomes `PageSpec.limit`.
    pub items_per_page: usize,
    /// Where pagination controls are drawn.
    pub pagination_position: PaginationPosition,
    /// Row and column spacing.
    pub density: Density,
    /// Whether rows can be selected.
    pub row_selection_enabled: bool,
}

impl Default for TablePresentationConfig {
    fn default() -> Self {
        TablePresentationConfig {
            visible_columns: None,
            items_per_page: DEFAULT_LIMIT,
            pagination_position: PaginationPosition::default(),
            density: Density::default(),
            row_selection_enabled: false,
        }
    }
}

impl TablePresentationConfig {
    /// Sets the visible columns.
    pub fn visible_columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible_columns = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the page size.
    pub fn items_per_page(mut self, n: usize) -> Self {
        self.items_per_page = n;
        self
    }

    /// Sets the pagination position.
    pub fn pagination_position(mut self, position: PaginationPosition) -> Self {
        self.pagination_position = position;
        self
    }

    /// Sets the density.
    pub fn density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    /// Enables or disables row selection.
    pub fn row_selection(mut self, enabled: bool) -> Self {
        self.row_selection_enabled = enabled;
        self
    }

    /// Checks the options against the column registry.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidItemsPerPage`] if the page size is zero
    /// - [`ConfigError::UnknownColumn`] if a visible column is not registered
    pub fn validate(&self, registry: &ColumnRegistry) -> Result<()> {
        if self.items_per_page == 0 {
            return Err(ConfigError::InvalidItemsPerPage);
        }
        if let Some(keys) = &self.visible_columns {
            if let Some(key) = keys.iter().find(|k| !registry.contains(k)) {
                return Err(ConfigError::UnknownColumn { key: key.clone() });
            }
        }
        Ok(())
    }

    /// Returns true if the column is currently shown.
    pub fn is_visible(&self, key: &str) -> bool {
        match &self.visible_columns {
            Some(keys) => keys.iter().any(|k| k == key),
            None => true,
        }
    }

    /// The visible columns, in registry order.
    pub fn visible<'r>(&self, registry: &'r ColumnRegistry) -> Vec<&'r ColumnDescriptor> {
        registry
            .columns()
            .iter()
            .filter(|c| self.is_visible(&c.key))
            .collect()
    }

    /// Shows a hidden column or hides a visible one.
    ///
    /// Returns the column's new visibility.
    pub fn toggle_column(&mut self, key: &str, registry: &ColumnRegistry) -> Result<bool> {
        if !registry.contains(key) {
            return Err(ConfigError::UnknownColumn {
                key: key.to_string(),
            });
        }
        let now_visible = !self.is_visible(key);
        let keys = registry
            .keys()
            .filter(|k| if *k == key { now_visible } else { self.is_visible(k) })
            .map(str::to_string)
            .collect();
        self.visible_columns = Some(keys);
        Ok(now_visible)
    }

    /// Page window for a 1-based page number.
    pub fn page_spec(&self, page_number: usize) -> PageSpec {
        PageSpec::for_page(page_number, self.items_per_page)
    }

    /// Number of pages needed for `total` records. Zero records still make one page.
    pub fn total_pages(&self, total: usize) -> usize {
        let per_page = self.items_per_page.max(1);
        total.div_ceil(per_page).max(1)
    }
}
