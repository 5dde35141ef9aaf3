//! `tabula columns`

use std::io::Write;

use anyhow::{Context, Result};
use tabula_query::{ColumnDescriptor, ColumnRegistry, QueryResult, Record};
use tabula_table::{PaginationPosition, TableConfig, TablePresentationConfig, TableView};

use crate::cli::{ColumnsArgs, OutputFormat};
use crate::render::{write_table, Styles};

pub fn run(args: &ColumnsArgs, out: &mut dyn Write, styles: &Styles) -> Result<()> {
    let config = TableConfig::load(&args.config)
        .with_context(|| format!("failed to load table config {}", args.config.display()))?;

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &config.columns)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            let (registry, result) = listing(&config)?;
            let presentation = TablePresentationConfig::default()
                .items_per_page(result.total.max(1))
                .pagination_position(PaginationPosition::None);
            let view = TableView::project(&result, &presentation, &registry, 1);
            write_table(out, &view, styles)?;
        }
    }
    Ok(())
}

/// One row per configured column, flagging the hidden ones.
fn listing(config: &TableConfig) -> Result<(ColumnRegistry, QueryResult)> {
    let registry = ColumnRegistry::new([
        ColumnDescriptor::new("key", "Key"),
        ColumnDescriptor::new("label", "Label"),
        ColumnDescriptor::new("kind", "Kind"),
        ColumnDescriptor::new("sortable", "Sortable"),
        ColumnDescriptor::new("searchable", "Searchable"),
        ColumnDescriptor::new("visible", "Visible"),
    ])?;
    let records: Vec<Record> = config
        .columns
        .columns()
        .iter()
        .map(|c| {
            Record::new()
                .with("key", c.key.as_str())
                .with("label", c.display_label())
                .with("kind", c.kind.as_str())
                .with("sortable", c.sortable)
                .with("searchable", c.searchable)
                .with("visible", config.presentation.is_visible(&c.key))
        })
        .collect();
    let result = QueryResult {
        total: records.len(),
        records,
        diagnostics: Vec::new(),
    };
    Ok((registry, result))
}
