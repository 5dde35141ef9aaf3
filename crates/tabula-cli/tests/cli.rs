//! Drives the CLI in-process against fixture files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;
use tabula_cli::{run, Cli};
use tabula_query::QueryError;
use tempfile::TempDir;

const USERS: &str = r#"[
  {"id": "u-1", "name": "Ana", "email": "ana@example.com", "role": "Admin", "created_at": "2023-01-05"},
  {"id": "u-2", "name": "Bob", "email": "bob@corp.test", "role": "Editor", "created_at": "2022-06-10"},
  {"id": "u-3", "name": "Chen", "email": "chen@example.com", "role": "Viewer", "created_at": "2024-02-01"},
  {"id": "u-4", "name": "Dana", "email": "dana@corp.test", "role": "Admin", "created_at": "2021-11-20"},
  {"id": "u-5", "name": "Eli", "email": "eli@example.com", "role": "Viewer", "created_at": "2023-07-15"}
]"#;

const CONFIG: &str = r#"
columns:
  - key: id
    label: ID
    sortable: false
    searchable: false
  - key: name
    label: Name
  - key: email
    label: Email
  - key: role
    label: Role
  - key: created_at
    label: Created
    kind: date
presentation:
  visible_columns: [name, role]
  items_per_page: 2
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("users.json"), USERS).unwrap();
        fs::write(dir.path().join("users.yaml"), CONFIG).unwrap();
        Fixture { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn data(&self) -> String {
        arg(&self.path("users.json"))
    }

    fn config(&self) -> String {
        arg(&self.path("users.yaml"))
    }
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn try_tabula(args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["tabula"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    let mut out = Vec::new();
    run(&cli, &mut out, false)?;
    Ok(String::from_utf8(out)?)
}

fn tabula(args: &[&str]) -> String {
    try_tabula(args).unwrap()
}

fn tabula_json(args: &[&str]) -> Value {
    serde_json::from_str(&tabula(args)).unwrap()
}

fn ids(result: &Value) -> Vec<&str> {
    result["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect()
}

#[test]
fn table_output_uses_config_columns_and_page_size() {
    let fx = Fixture::new();
    let out = tabula(&["query", "-d", &fx.data(), "-c", &fx.config(), "--sort", "name:desc"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Name  Role");
    assert_eq!(lines[2], "Eli   Viewer");
    assert_eq!(lines[3], "Dana  Admin");
    assert_eq!(lines[4], "Page 1 of 3  Showing 1-2 of 5  [next]");
}

#[test]
fn last_page_shows_remaining_record() {
    let fx = Fixture::new();
    let out = tabula(&["query", "-d", &fx.data(), "-c", &fx.config(), "--page", "3"]);
    assert!(out.contains("Eli"));
    assert!(out.contains("Page 3 of 3  Showing 5-5 of 5  [prev]"));
}

#[test]
fn unaligned_window_summarises_rows_shown() {
    let fx = Fixture::new();
    let out = tabula(&[
        "query", "-d", &fx.data(), "-c", &fx.config(), "--offset", "1", "--limit", "2",
    ]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[2], "Bob   Editor");
    assert_eq!(lines[3], "Chen  Viewer");
    assert_eq!(lines[4], "Page 1 of 3  Showing 2-3 of 5  [prev]  [next]");
}

#[test]
fn any_match_filters_sorted_by_date() {
    let fx = Fixture::new();
    let result = tabula_json(&[
        "query", "-d", &fx.data(), "-c", &fx.config(),
        "-f", "role:equals:Admin", "-f", "role:equals:Editor", "--match", "any",
        "--sort", "created_at", "--per-page", "10", "--format", "json",
    ]);
    assert_eq!(result["total"], 3);
    assert_eq!(ids(&result), vec!["u-4", "u-2", "u-1"]);
}

#[test]
fn search_and_where_combine() {
    let fx = Fixture::new();
    let result = tabula_json(&[
        "query", "-d", &fx.data(), "-c", &fx.config(),
        "-s", "EXAMPLE.com", "-w", "role=view", "--format", "json",
    ]);
    assert_eq!(result["total"], 2);
    assert_eq!(ids(&result), vec!["u-3", "u-5"]);
}

#[test]
fn request_file_keeps_its_window() {
    let fx = Fixture::new();
    let request = fx.path("request.json");
    fs::write(
        &request,
        r#"{
            "advancedFilters": [
                {"field": "role", "operator": "equals", "value": "Admin", "conjunction": "OR"},
                {"field": "role", "operator": "equals", "value": "Viewer"}
            ],
            "sort": {"field": "name", "direction": "asc"},
            "page": {"offset": 2, "limit": 2}
        }"#,
    )
    .unwrap();
    let result = tabula_json(&[
        "query", "-d", &fx.data(), "-c", &fx.config(), "--request", &arg(&request),
        "--format", "json",
    ]);
    assert_eq!(result["total"], 4);
    assert_eq!(ids(&result), vec!["u-4", "u-5"]);
}

#[test]
fn unknown_filter_field_is_reported() {
    let fx = Fixture::new();
    let out = tabula(&["query", "-d", &fx.data(), "-c", &fx.config(), "-f", "team:equals:core"]);
    assert!(out.contains("No matching records."));
    assert!(out.contains("Showing 0 of 0"));
    assert!(out.contains("warning: filter on unknown field 'team' matches no records"));
}

#[test]
fn invalid_operator_fails() {
    let fx = Fixture::new();
    let err = try_tabula(&["query", "-d", &fx.data(), "-c", &fx.config(), "-f", "role:sideways:x"])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QueryError>(),
        Some(QueryError::InvalidOperator { .. })
    ));
    assert!(format!("{:#}", err).contains("invalid operator 'sideways' on field 'role'"));
}

#[test]
fn sorting_unsortable_column_fails() {
    let fx = Fixture::new();
    let err = try_tabula(&["query", "-d", &fx.data(), "-c", &fx.config(), "--sort", "id"])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QueryError>(),
        Some(QueryError::NotSortable { .. })
    ));
}

#[test]
fn missing_data_file_names_the_path() {
    let fx = Fixture::new();
    let missing = arg(&fx.path("nope.json"));
    let err = try_tabula(&["query", "-d", &missing]).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}

#[test]
fn generated_dataset_queries_without_config() {
    let fx = Fixture::new();
    let data = arg(&fx.path("generated.json"));
    let out = tabula(&["generate", "-n", "300", "--seed", "3", "-o", &data]);
    assert!(out.starts_with("wrote 300 records to"));

    let all = tabula_json(&["query", "-d", &data, "--per-page", "1000", "--format", "json"]);
    assert_eq!(all["total"], 300);

    let admins = tabula_json(&[
        "query", "-d", &data, "-f", "role:equals:admin", "--per-page", "1000", "--format", "json",
    ]);
    let records = admins["records"].as_array().unwrap();
    assert!(!records.is_empty());
    assert_eq!(admins["total"], records.len());
    assert!(records.iter().all(|r| r["role"] == "Admin"));
}

#[test]
fn columns_lists_registry() {
    let fx = Fixture::new();
    let columns = tabula_json(&["columns", "-c", &fx.config(), "--format", "json"]);
    let keys: Vec<&str> = columns
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["id", "name", "email", "role", "created_at"]);

    let table = tabula(&["columns", "-c", &fx.config()]);
    assert!(table.lines().next().unwrap().starts_with("Key"));
    assert!(table.contains("created_at"));
    assert!(!table.contains("Page "));
}
