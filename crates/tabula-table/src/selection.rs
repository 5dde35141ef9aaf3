//! Client-side row selection.
//!
//! Selection is keyed by record id and lives entirely in the caller; it is
//! never part of a query result. Replacing the displayed page should call
//! [`RowSelection::reset`].

use std::collections::BTreeSet;

use tabula_query::QueryResult;

use crate::presentation::TablePresentationConfig;

/// The set of selected record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    enabled: bool,
    selected: BTreeSet<String>,
}

impl RowSelection {
    /// Creates an empty selection. A disabled selection ignores every change.
    pub fn new(enabled: bool) -> Self {
        RowSelection {
            enabled,
            selected: BTreeSet::new(),
        }
    }

    /// Creates a selection honouring `row_selection_enabled`.
    pub fn for_config(config: &TablePresentationConfig) -> Self {
        RowSelection::new(config.row_selection_enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clears the selection.
    pub fn reset(&mut self) {
        self.selected.clear();
    }

    /// Flips one id. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.enabled {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
            return true;
        }
        false
    }

    /// Selects every record on the page that has an id.
    pub fn select_page(&mut self, page: &QueryResult) {
        if self.enabled {
            self.selected.extend(page.ids());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in sorted order.
    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
