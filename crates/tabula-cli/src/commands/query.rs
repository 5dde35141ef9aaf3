//! `tabula query`

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tabula_query::{
    ColumnDescriptor, ColumnRegistry, Conjunction, ExecutionControl, PageSpec, QueryEngine,
    QueryRequest, Record,
};
use tabula_store::{RecordRepository, SnapshotRepository};
use tabula_table::{TableConfig, TablePresentationConfig, TableView};

use crate::cli::{MatchMode, OutputFormat, QueryArgs};
use crate::render::{write_table, Styles};

pub fn run(args: &QueryArgs, out: &mut dyn Write, styles: &Styles) -> Result<()> {
    let records = load_records(&args.data)?;
    let mut config = match &args.config {
        Some(path) => TableConfig::load(path)
            .with_context(|| format!("failed to load table config {}", path.display()))?,
        None => infer_config(&records)?,
    };

    let repo = SnapshotRepository::new(records).context("invalid dataset")?;
    let engine = QueryEngine::new(config.columns.clone());

    let request = build_request(args, &mut config.presentation)?;
    let control = match args.timeout_ms {
        Some(ms) => ExecutionControl::unbounded().with_timeout(Duration::from_millis(ms)),
        None => ExecutionControl::unbounded(),
    };

    let snapshot = repo.snapshot()?;
    let result = engine
        .execute_with(snapshot.records(), &request, &control)
        .context("query failed")?;
    tracing::debug!(
        total = result.total,
        offset = request.page.offset,
        limit = request.page.limit(),
        shown = result.len(),
        "query finished"
    );

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &result)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            let view = TableView::project_window(
                &result,
                &config.presentation,
                &config.columns,
                request.page,
            );
            write_table(out, &view, styles)?;
        }
    }
    Ok(())
}

/// Reads a JSON array of flat records.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a JSON array of flat records", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}

/// One text column per field of the first record, all sortable and searchable.
pub fn infer_config(records: &[Record]) -> Result<TableConfig> {
    let columns = records
        .first()
        .map(|r| {
            r.iter()
                .map(|(key, _)| ColumnDescriptor::new(key, key))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let config = TableConfig {
        columns: ColumnRegistry::new(columns)?,
        presentation: TablePresentationConfig::default(),
    };
    Ok(config)
}

/// Combines the optional request document with the command-line flags.
///
/// The presentation page size is updated to match the window actually used.
fn build_request(
    args: &QueryArgs,
    presentation: &mut TablePresentationConfig,
) -> Result<QueryRequest> {
    let mut request = match &args.request {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("{} is not a valid query request", path.display()))?
        }
        None => QueryRequest::new(),
    };

    if let Some(term) = &args.search {
        request.search_term = term.clone();
    }
    if !args.filters.is_empty() {
        let link = match args.match_mode {
            MatchMode::All => Conjunction::And,
            MatchMode::Any => Conjunction::Or,
        };
        request.advanced_filters = args
            .filters
            .iter()
            .cloned()
            .map(|f| f.linked(link))
            .collect();
    }
    for (field, value) in &args.wheres {
        request.simple_filters.insert(field.clone(), value.clone());
    }
    if let Some(sort) = &args.sort {
        request.sort = sort.clone();
    }

    if let Some(per_page) = args.per_page {
        presentation.items_per_page = per_page.max(1);
    }
    if args.has_window() {
        request.page = PageSpec::new(
            args.offset.unwrap_or(0),
            args.limit.unwrap_or(presentation.items_per_page),
        );
    } else if args.page.is_some() || args.per_page.is_some() || args.request.is_none() {
        request.page = presentation.page_spec(args.page.unwrap_or(1));
    }

    presentation.items_per_page = request.page.limit();
    Ok(request)
}
