//! Query requests and page windows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::FilterCondition;
use crate::ordering::{Dir, SortSpec};

/// Default page size when none is given.
pub const DEFAULT_LIMIT: usize = 10;

/// A contiguous half-open window `[offset, offset + limit)` over the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Number of results to skip.
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for PageSpec {
    fn default() -> Self {
        PageSpec {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageSpec {
    /// Creates a page window.
    pub fn new(offset: usize, limit: usize) -> Self {
        PageSpec { offset, limit }
    }

    /// Window for a 1-based page number. Page 0 is treated as page 1.
    pub fn for_page(page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        PageSpec {
            offset: (page.max(1) - 1).saturating_mul(per_page),
            limit: per_page,
        }
    }

    /// Limit, ensuring a minimum of 1.
    pub fn limit(&self) -> usize {
        self.limit.max(1)
    }

    /// Index range of this page within `total` results.
    ///
    /// Empty when the offset is at or past the end.
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(total);
        let end = self.offset.saturating_add(self.limit()).min(total);
        start..end
    }
}

/// Everything needed to produce one page of results.
///
/// # Example
///
/// ```
/// use tabula_query::{FilterCondition, Operator, PageSpec, QueryRequest, SortSpec};
///
/// let request = QueryRequest::new()
///     .search("ana")
///     .filter(FilterCondition::new("role", Operator::Equals, "Admin").or())
///     .filter(FilterCondition::new("role", Operator::Equals, "Editor"))
///     .sort(SortSpec::desc("name"))
///     .page(PageSpec::new(0, 25));
///
/// assert_eq!(request.advanced_filters.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Global free-text search term; empty means no search.
    #[serde(default)]
    pub search_term: String,
    /// Advanced filter chain; an empty or all-inactive chain means no advanced filter.
    #[serde(default)]
    pub advanced_filters: Vec<FilterCondition>,
    /// Per-column substring filters, ignored when the advanced chain is active.
    #[serde(default)]
    pub simple_filters: BTreeMap<String, String>,
    /// Sort specification.
    #[serde(default)]
    pub sort: SortSpec,
    /// Page window.
    #[serde(default)]
    pub page: PageSpec,
}

impl QueryRequest {
    /// Creates a request that returns the first page of everything.
    pub fn new() -> Self {
        QueryRequest::default()
    }

    /// Sets the free-text search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Appends a condition to the advanced filter chain.
    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.advanced_filters.push(condition);
        self
    }

    /// Replaces the advanced filter chain.
    pub fn filters(mut self, conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        self.advanced_filters = conditions.into_iter().collect();
        self
    }

    /// Adds a simple per-column substring filter.
    pub fn simple_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.simple_filters.insert(field.into(), value.into());
        self
    }

    /// Sets the sort specification.
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Shorthand for sorting by a field.
    pub fn order_by(self, field: impl Into<String>, direction: Dir) -> Self {
        self.sort(SortSpec::by(field, direction))
    }

    /// Sets the page window.
    pub fn page(mut self, page: PageSpec) -> Self {
        self.page = page;
        self
    }

    /// Sets offset and limit.
    pub fn window(self, offset: usize, limit: usize) -> Self {
        self.page(PageSpec::new(offset, limit))
    }

    /// The trimmed search term, if any.
    pub fn active_search(&self) -> Option<&str> {
        Some(self.search_term.trim()).filter(|t| !t.is_empty())
    }
}
