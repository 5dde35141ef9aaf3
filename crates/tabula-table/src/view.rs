//! Projection of a query result into a displayable table page.
//!
//! [`TableView::project`] applies a [`TablePresentationConfig`] to a
//! [`QueryResult`]: it picks the visible columns, turns each record into a
//! row of cell strings, computes pagination controls and a "Showing X-Y of Z"
//! summary, and converts query diagnostics into warning messages.

use serde::Serialize;
use tabula_query::{ColumnRegistry, PageSpec, QueryResult, Record, Value};

use crate::actions::{ResolvedActions, RowAction};
use crate::message::Message;
use crate::presentation::{Density, PaginationPosition, TablePresentationConfig};
use crate::selection::RowSelection;

/// Text shown for a missing or null cell.
pub const EMPTY_CELL: &str = "-";

/// Pagination controls for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Current page, 1-based.
    pub page: usize,
    pub per_page: usize,
    /// Matches across all pages.
    pub total: usize,
    /// At least 1, even when nothing matched.
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// 1-based position of the first row on this page; 0 when the page is empty.
    pub first_item: usize,
    /// 1-based position of the last row on this page; 0 when the page is empty.
    pub last_item: usize,
}

impl PaginationInfo {
    /// Computes controls for a page holding `shown` rows.
    pub fn new(page: usize, per_page: usize, total: usize, shown: usize) -> Self {
        PaginationInfo::for_window(PageSpec::for_page(page, per_page), total, shown)
    }

    /// Computes controls for an arbitrary window holding `shown` rows.
    ///
    /// Item positions come from the window offset, so windows that do not
    /// start on a page boundary still report the rows actually shown. `page`
    /// is the page the first row falls on.
    pub fn for_window(window: PageSpec, total: usize, shown: usize) -> Self {
        let per_page = window.limit();
        let start = window.offset;
        let (first_item, last_item) = if shown == 0 {
            (0, 0)
        } else {
            (start + 1, start + shown)
        };

        PaginationInfo {
            page: start / per_page + 1,
            per_page,
            total,
            total_pages: total.div_ceil(per_page).max(1),
            has_prev: start > 0,
            has_next: start.saturating_add(per_page) < total,
            first_item,
            last_item,
        }
    }

    /// "Showing X-Y of Z", or "Showing 0 of Z" for an empty page.
    pub fn summary(&self) -> String {
        if self.first_item == 0 {
            format!("Showing 0 of {}", self.total)
        } else {
            format!(
                "Showing {}-{} of {}",
                self.first_item, self.last_item, self.total
            )
        }
    }
}

/// A visible column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
}

/// One displayed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cell text, one per visible column.
    pub cells: Vec<String>,
    pub selected: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<RowAction>,
}

/// A page of records shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<TableRow>,
    pub pagination: PaginationInfo,
    pub pagination_position: PaginationPosition,
    pub density: Density,
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

impl TableView {
    /// Shapes one page of results.
    ///
    /// `page_number` is the 1-based page the result was fetched for, normally
    /// with `config.page_spec(page_number)`.
    pub fn project(
        result: &QueryResult,
        config: &TablePresentationConfig,
        registry: &ColumnRegistry,
        page_number: usize,
    ) -> Self {
        TableView::project_window(result, config, registry, config.page_spec(page_number))
    }

    /// Shapes a result fetched with an explicit offset/limit window.
    pub fn project_window(
        result: &QueryResult,
        config: &TablePresentationConfig,
        registry: &ColumnRegistry,
        window: PageSpec,
    ) -> Self {
        let columns = config.visible(registry);
        let headers = columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.display_label().to_string(),
            })
            .collect();

        let rows = result
            .records
            .iter()
            .map(|record| TableRow {
                id: record.id(),
                cells: columns.iter().map(|c| cell_text(record, &c.key)).collect(),
                selected: false,
                actions: Vec::new(),
            })
            .collect();

        let pagination = PaginationInfo::for_window(window, result.total, result.records.len());

        TableView {
            headers,
            rows,
            summary: pagination.summary(),
            pagination,
            pagination_position: config.pagination_position,
            density: config.density,
            messages: result.diagnostics.iter().map(Message::from).collect(),
        }
    }

    /// Marks rows whose id is selected.
    pub fn with_selection(mut self, selection: &RowSelection) -> Self {
        for row in &mut self.rows {
            row.selected = row.id.as_deref().is_some_and(|id| selection.is_selected(id));
        }
        self
    }

    /// Attaches context actions to each row.
    ///
    /// `result` must be the result this view was projected from.
    pub fn with_actions(mut self, result: &QueryResult, actions: &ResolvedActions) -> Self {
        if !actions.has_context_actions() {
            return self;
        }
        for (row, record) in self.rows.iter_mut().zip(&result.records) {
            row.actions = actions.actions_for(record);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.headers.iter().map(|h| h.label.as_str()).collect()
    }
}

fn cell_text(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => EMPTY_CELL.to_string(),
        Some(value) => value.to_text().into_owned(),
    }
}
