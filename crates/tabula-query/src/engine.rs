//! The query engine: search, filter, sort, paginate.
//!
//! [`QueryEngine::execute`] runs the stages in a fixed order against an
//! immutable slice of records:
//!
//! 1. free-text search over the searchable columns
//! 2. the advanced filter chain, or the simple per-column filters when the
//!    chain has no active condition
//! 3. total = number of survivors
//! 4. stable sort on one column
//! 5. the `[offset, offset + limit)` window
//!
//! The engine holds no mutable state, so one engine can serve concurrent
//! queries against the same snapshot.

use rayon::prelude::*;

use crate::chain::ConditionChain;
use crate::column::{ColumnKind, ColumnRegistry};
use crate::control::ExecutionControl;
use crate::error::{QueryError, Result};
use crate::ordering::{Dir, SortKey};
use crate::record::Record;
use crate::request::QueryRequest;
use crate::result::{Diagnostic, QueryResult};

/// Tuning knobs for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Collections at least this large are filtered and sorted in parallel.
    pub parallel_threshold: usize,
    /// Records scanned between cancellation/deadline checks.
    pub cancel_check_interval: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            parallel_threshold: 100_000,
            cancel_check_interval: 4096,
        }
    }
}

/// Runs [`QueryRequest`]s against record collections.
///
/// # Example
///
/// ```
/// use tabula_query::{
///     ColumnDescriptor, ColumnRegistry, FilterCondition, Operator, QueryEngine, QueryRequest,
///     Record, SortSpec,
/// };
///
/// let registry = ColumnRegistry::new([
///     ColumnDescriptor::new("name", "Name"),
///     ColumnDescriptor::new("role", "Role"),
/// ])
/// .unwrap();
/// let engine = QueryEngine::new(registry);
///
/// let records = vec![
///     Record::new().with("id", 1).with("name", "Ana").with("role", "Admin"),
///     Record::new().with("id", 2).with("name", "Bob").with("role", "Editor"),
///     Record::new().with("id", 3).with("name", "Cy").with("role", "Viewer"),
/// ];
///
/// let request = QueryRequest::new()
///     .filter(FilterCondition::new("role", Operator::Equals, "admin").or())
///     .filter(FilterCondition::new("role", Operator::Equals, "editor"))
///     .sort(SortSpec::desc("name"));
///
/// let result = engine.execute(&records, &request).unwrap();
/// assert_eq!(result.total, 2);
/// assert_eq!(result.records[0].text("name"), "Bob");
/// ```
#[derive(Debug, Clone)]
pub struct QueryEngine {
    registry: ColumnRegistry,
    options: EngineOptions,
}

impl QueryEngine {
    /// Creates an engine with default options.
    pub fn new(registry: ColumnRegistry) -> Self {
        QueryEngine::with_options(registry, EngineOptions::default())
    }

    /// Creates an engine with explicit options.
    pub fn with_options(registry: ColumnRegistry, options: EngineOptions) -> Self {
        QueryEngine { registry, options }
    }

    /// The column registry this engine validates against.
    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// The engine options.
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Runs a request to completion.
    pub fn execute(&self, records: &[Record], request: &QueryRequest) -> Result<QueryResult> {
        self.execute_with(records, request, &ExecutionControl::unbounded())
    }

    /// Runs a request, honouring the control's deadline and cancellation token.
    ///
    /// Request errors (`InvalidOperator`, `NotSortable`) are reported before
    /// any record is scanned.
    pub fn execute_with(
        &self,
        records: &[Record],
        request: &QueryRequest,
        control: &ExecutionControl,
    ) -> Result<QueryResult> {
        let plan = Plan::compile(&self.registry, request)?;
        let parallel = records.len() >= self.options.parallel_threshold;

        let mut matched = if plan.matches_everything() {
            control.check()?;
            records.iter().collect()
        } else if parallel {
            self.filter_parallel(records, &plan, control)?
        } else {
            self.filter_sequential(records, &plan, control)?
        };
        let total = matched.len();
        tracing::debug!(scanned = records.len(), total, parallel, "filter stages done");

        if let Some((field, kind, dir)) = plan.sort {
            control.check()?;
            matched = sort_records(matched, field, kind, dir, parallel);
        }

        control.check()?;
        let page = request.page.range(total);
        let records = matched[page].iter().map(|r| (*r).clone()).collect();

        Ok(QueryResult {
            records,
            total,
            diagnostics: plan.diagnostics,
        })
    }

    fn filter_sequential<'a>(
        &self,
        records: &'a [Record],
        plan: &Plan<'_>,
        control: &ExecutionControl,
    ) -> Result<Vec<&'a Record>> {
        let mut matched = Vec::new();
        for chunk in records.chunks(self.check_interval()) {
            control.check()?;
            matched.extend(chunk.iter().filter(|r| plan.matches(r)));
        }
        Ok(matched)
    }

    fn filter_parallel<'a>(
        &self,
        records: &'a [Record],
        plan: &Plan<'_>,
        control: &ExecutionControl,
    ) -> Result<Vec<&'a Record>> {
        let chunks: Vec<Vec<&'a Record>> = records
            .par_chunks(self.check_interval())
            .map(|chunk| -> Result<Vec<&'a Record>> {
                control.check()?;
                Ok(chunk.iter().filter(|r| plan.matches(r)).collect())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(chunks.into_iter().flatten().collect())
    }

    fn check_interval(&self) -> usize {
        self.options.cancel_check_interval.max(1)
    }
}

fn sort_records<'a>(
    matched: Vec<&'a Record>,
    field: &str,
    kind: ColumnKind,
    dir: Dir,
    parallel: bool,
) -> Vec<&'a Record> {
    let mut keyed: Vec<(SortKey, &'a Record)> = matched
        .into_iter()
        .map(|r| (SortKey::extract(r, field, kind), r))
        .collect();

    // Both sorts are stable: reversing the comparator (not the output) keeps
    // equal keys in input order for descending sorts too.
    let compare = |a: &(SortKey, &Record), b: &(SortKey, &Record)| dir.apply(a.0.compare(&b.0));
    if parallel {
        keyed.par_sort_by(compare);
    } else {
        keyed.sort_by(compare);
    }
    keyed.into_iter().map(|(_, r)| r).collect()
}

/// A request validated against the registry.
struct Plan<'q> {
    search: Option<Search<'q>>,
    chain: ConditionChain,
    simple: Vec<SimpleFilter<'q>>,
    sort: Option<(&'q str, ColumnKind, Dir)>,
    diagnostics: Vec<Diagnostic>,
}

struct Search<'q> {
    needle: String,
    keys: Vec<&'q str>,
}

struct SimpleFilter<'q> {
    field: &'q str,
    needle: String,
    known_field: bool,
}

impl<'q> Plan<'q> {
    fn compile(registry: &'q ColumnRegistry, request: &'q QueryRequest) -> Result<Self> {
        let mut diagnostics = Vec::new();

        let sort = match request.sort.active_field() {
            Some(field) => {
                let column = registry
                    .get(field)
                    .filter(|c| c.sortable)
                    .ok_or_else(|| QueryError::NotSortable {
                        field: field.to_string(),
                    })?;
                Some((column.key.as_str(), column.kind, request.sort.direction))
            }
            None => None,
        };

        let chain = ConditionChain::compile(&request.advanced_filters, registry)?;
        diagnostics.extend(
            chain
                .unknown_fields()
                .iter()
                .map(|field| Diagnostic::UnknownFilterField {
                    field: field.clone(),
                }),
        );

        // Advanced filters take full precedence over simple ones.
        let mut simple = Vec::new();
        if chain.is_empty() {
            for (field, value) in &request.simple_filters {
                let field = field.trim();
                if field.is_empty() || value.trim().is_empty() {
                    continue;
                }
                let known_field = registry.contains(field);
                if !known_field {
                    tracing::warn!(field, "simple filter references unknown field");
                    diagnostics.push(Diagnostic::UnknownFilterField {
                        field: field.to_string(),
                    });
                }
                simple.push(SimpleFilter {
                    field,
                    needle: value.to_lowercase(),
                    known_field,
                });
            }
        }

        let search = request.active_search().map(|term| Search {
            needle: term.to_lowercase(),
            keys: registry.searchable_keys(),
        });
        if search.as_ref().is_some_and(|s| s.keys.is_empty()) {
            tracing::warn!("search term given but no columns are searchable");
            diagnostics.push(Diagnostic::NoSearchableColumns);
        }

        Ok(Plan {
            search,
            chain,
            simple,
            sort,
            diagnostics,
        })
    }

    fn matches_everything(&self) -> bool {
        self.search.is_none() && self.chain.is_empty() && self.simple.is_empty()
    }

    fn matches(&self, record: &Record) -> bool {
        if let Some(search) = &self.search {
            if !search.matches(record) {
                return false;
            }
        }
        if !self.chain.is_empty() {
            return self.chain.matches(record);
        }
        self.simple.iter().all(|f| f.matches(record))
    }
}

impl Search<'_> {
    fn matches(&self, record: &Record) -> bool {
        if self.keys.is_empty() {
            return false;
        }
        let haystack = self
            .keys
            .iter()
            .map(|key| record.lowercase_text(key))
            .collect::<Vec<_>>()
            .join(" ");
        haystack.contains(&self.needle)
    }
}

impl SimpleFilter<'_> {
    fn matches(&self, record: &Record) -> bool {
        self.known_field && record.lowercase_text(self.field).contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDescriptor;
    use crate::condition::FilterCondition;
    use crate::control::CancellationToken;
    use crate::op::Operator;
    use crate::ordering::SortSpec;
    use crate::request::PageSpec;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::new([
            ColumnDescriptor::new("id", "ID").searchable(false),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("email", "Email"),
            ColumnDescriptor::new("role", "Role"),
            ColumnDescriptor::new("notes", "Notes").sortable(false).searchable(false),
            ColumnDescriptor::new("age", "Age").kind(ColumnKind::Numeric),
        ])
        .unwrap()
    }

    fn users() -> Vec<Record> {
        [
            ("1", "Ana", "ana@example.com", "Admin", 34),
            ("2", "Bob", "bob@example.com", "Editor", 9),
            ("3", "Carla", "carla@corp.io", "Viewer", 27),
            ("4", "Dan", "dan@example.com", "Admin", 41),
            ("5", "Eve", "eve@corp.io", "Viewer", 100),
        ]
        .into_iter()
        .map(|(id, name, email, role, age)| {
            Record::new()
                .with("id", id)
                .with("name", name)
                .with("email", email)
                .with("role", role)
                .with("age", age)
        })
        .collect()
    }

    fn names(result: &QueryResult) -> Vec<String> {
        result.records.iter().map(|r| r.text("name")).collect()
    }

    #[test]
    fn empty_request_returns_first_page_of_everything() {
        let engine = QueryEngine::new(registry());
        let result = engine.execute(&users(), &QueryRequest::new()).unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(names(&result), vec!["Ana", "Bob", "Carla", "Dan", "Eve"]);
        assert!(!result.has_diagnostics());
    }

    #[test]
    fn search_only_looks_at_searchable_columns() {
        let engine = QueryEngine::new(registry());
        let records = vec![
            Record::new().with("id", "admin-1").with("name", "Zed").with("notes", "admin"),
            Record::new().with("id", "2").with("name", "Yan").with("role", "ADMIN"),
        ];
        let result = engine
            .execute(&records, &QueryRequest::new().search("admin"))
            .unwrap();
        assert_eq!(names(&result), vec!["Yan"]);
    }

    #[test]
    fn search_without_searchable_columns_matches_nothing() {
        let registry = ColumnRegistry::new([ColumnDescriptor::new("name", "Name").searchable(false)])
            .unwrap();
        let engine = QueryEngine::new(registry);
        let result = engine
            .execute(&users(), &QueryRequest::new().search("ana"))
            .unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(result.diagnostics, vec![Diagnostic::NoSearchableColumns]);
    }

    #[test]
    fn advanced_filters_override_simple_filters() {
        let engine = QueryEngine::new(registry());
        let request = QueryRequest::new()
            .filter(FilterCondition::new("role", Operator::Equals, "viewer"))
            .simple_filter("role", "admin");
        let result = engine.execute(&users(), &request).unwrap();
        assert_eq!(names(&result), vec!["Carla", "Eve"]);
    }

    #[test]
    fn simple_filters_apply_when_chain_is_inactive() {
        let engine = QueryEngine::new(registry());
        let request = QueryRequest::new()
            .filter(FilterCondition::new("role", Operator::Equals, "  "))
            .simple_filter("email", "EXAMPLE")
            .simple_filter("role", "adm");
        let result = engine.execute(&users(), &request).unwrap();
        assert_eq!(names(&result), vec!["Ana", "Dan"]);
    }

    #[test]
    fn simple_filter_on_unknown_field_matches_nothing() {
        let engine = QueryEngine::new(registry());
        let request = QueryRequest::new().simple_filter("salary", "1");
        let result = engine.execute(&users(), &request).unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::UnknownFilterField {
                field: "salary".to_string()
            }]
        );
    }

    #[test]
    fn invalid_operator_fails_even_on_empty_collection() {
        let engine = QueryEngine::new(registry());
        let request = QueryRequest::new().filter(FilterCondition::raw("role", "gt", "a"));
        assert!(matches!(
            engine.execute(&[], &request),
            Err(QueryError::InvalidOperator { .. })
        ));
    }

    #[test]
    fn sort_on_non_sortable_or_unknown_column_fails() {
        let engine = QueryEngine::new(registry());
        for field in ["notes", "salary"] {
            let err = engine
                .execute(&users(), &QueryRequest::new().sort(SortSpec::asc(field)))
                .unwrap_err();
            assert_eq!(
                err,
                QueryError::NotSortable {
                    field: field.to_string()
                }
            );
        }
    }

    #[test]
    fn numeric_column_sorts_numerically() {
        let engine = QueryEngine::new(registry());
        let result = engine
            .execute(&users(), &QueryRequest::new().sort(SortSpec::asc("age")))
            .unwrap();
        assert_eq!(names(&result), vec!["Bob", "Carla", "Ana", "Dan", "Eve"]);
    }

    #[test]
    fn sort_then_paginate() {
        let engine = QueryEngine::new(registry());
        let request = QueryRequest::new()
            .sort(SortSpec::desc("name"))
            .page(PageSpec::new(1, 2));
        let result = engine.execute(&users(), &request).unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(names(&result), vec!["Dan", "Carla"]);
    }

    #[test]
    fn parallel_path_matches_sequential_path() {
        let records: Vec<Record> = (0..500)
            .map(|i| {
                Record::new()
                    .with("id", i)
                    .with("name", format!("user{}", i % 37))
                    .with("role", ["Admin", "Editor", "Viewer"][i as usize % 3])
            })
            .collect();
        let request = QueryRequest::new()
            .filter(FilterCondition::new("role", Operator::Equals, "viewer").or())
            .filter(FilterCondition::new("name", Operator::EndsWith, "1"))
            .sort(SortSpec::desc("name"))
            .window(10, 50);

        let sequential = QueryEngine::new(registry()).execute(&records, &request).unwrap();
        let parallel = QueryEngine::with_options(
            registry(),
            EngineOptions {
                parallel_threshold: 1,
                cancel_check_interval: 7,
            },
        )
        .execute(&records, &request)
        .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn cancelled_query_stops() {
        let engine = QueryEngine::new(registry());
        let token = CancellationToken::new();
        token.cancel();
        let control = ExecutionControl::unbounded().with_token(token);
        let result = engine.execute_with(&users(), &QueryRequest::new().search("a"), &control);
        assert_eq!(result, Err(QueryError::Cancelled));
    }

    #[test]
    fn engine_does_not_mutate_source() {
        let engine = QueryEngine::new(registry());
        let records = users();
        let before = records.clone();
        engine
            .execute(&records, &QueryRequest::new().sort(SortSpec::desc("name")))
            .unwrap();
        assert_eq!(records, before);
    }
}
