//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tabula_query::{Dir, FilterCondition, SortSpec};

/// Browse JSON record collections: search, filter, sort and page.
#[derive(Debug, Parser)]
#[command(name = "tabula", version, about)]
pub struct Cli {
    /// Log engine diagnostics to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a query and print one page
    Query(QueryArgs),

    /// Write a synthetic users dataset
    Generate(GenerateArgs),

    /// List the columns declared in a table config
    Columns(ColumnsArgs),
}

/// How repeated `--filter` flags are linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
    /// Every filter must match (AND)
    #[default]
    All,
    /// At least one filter must match (OR)
    Any,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// JSON file holding an array of flat records
    #[arg(short, long, value_name = "FILE")]
    pub data: PathBuf,

    /// Table config (.yaml, .yml or .json); columns are inferred when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Full query request as JSON; other flags override its fields
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Free-text search over searchable columns
    #[arg(short, long)]
    pub search: Option<String>,

    /// Advanced filter, repeatable
    #[arg(short, long = "filter", value_name = "FIELD:OPERATOR:VALUE", value_parser = parse_filter)]
    pub filters: Vec<FilterCondition>,

    /// How repeated --filter flags combine
    #[arg(long = "match", value_enum, default_value_t = MatchMode::All)]
    pub match_mode: MatchMode,

    /// Simple per-column substring filter, repeatable; ignored when --filter is given
    #[arg(short = 'w', long = "where", value_name = "FIELD=TEXT", value_parser = parse_where)]
    pub wheres: Vec<(String, String)>,

    /// Sort column with optional direction
    #[arg(long, value_name = "FIELD[:asc|desc]", value_parser = parse_sort)]
    pub sort: Option<SortSpec>,

    /// 1-based page number
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Page size; defaults to the config's items_per_page
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Raw window offset (overrides --page)
    #[arg(long)]
    pub offset: Option<usize>,

    /// Raw window size (overrides --per-page)
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Abort the query after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

impl QueryArgs {
    /// Returns true if an explicit offset/limit window was given.
    pub fn has_window(&self) -> bool {
        self.offset.is_some() || self.limit.is_some()
    }
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of records
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Table config (.yaml, .yml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Parses `field:operator:value`. The value may itself contain colons.
pub fn parse_filter(s: &str) -> Result<FilterCondition, String> {
    let mut parts = s.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(op), Some(value)) if !field.is_empty() && !op.is_empty() => {
            Ok(FilterCondition::raw(field, op, value))
        }
        _ => Err(format!("expected FIELD:OPERATOR:VALUE, got '{}'", s)),
    }
}

/// Parses `field=text`.
pub fn parse_where(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=TEXT, got '{}'", s)),
    }
}

/// Parses `field`, `field:asc` or `field:desc`.
pub fn parse_sort(s: &str) -> Result<SortSpec, String> {
    let (field, dir) = match s.rsplit_once(':') {
        Some((field, dir)) => {
            let dir = Dir::parse(dir)
                .ok_or_else(|| format!("sort direction must be asc or desc, got '{}'", dir))?;
            (field, dir)
        }
        None => (s, Dir::Asc),
    };
    if field.trim().is_empty() {
        return Err("sort field is empty".to_string());
    }
    Ok(SortSpec::by(field.trim(), dir))
}
