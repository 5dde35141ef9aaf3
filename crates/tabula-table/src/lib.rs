//! Tabula table - presentation layer for tabula query results.
//!
//! The query engine returns a [`QueryResult`](tabula_query::QueryResult):
//! one page of records plus a total. This crate is the caller side of that
//! contract. It owns everything the engine deliberately ignores:
//!
//! - [`TablePresentationConfig`]: visible columns, page size, pagination
//!   position, density and whether rows can be selected
//! - [`TableView`]: a page projected into headers, cell strings and
//!   pagination controls
//! - [`RowSelection`]: selected record ids, reset whenever the page changes
//! - [`RowActionProvider`]: per-row context actions, resolved once per column
//! - [`TableConfig`]: the YAML/JSON document that declares the column
//!   registry and presentation options at startup
//!
//! # Example
//!
//! ```rust
//! use tabula_query::{QueryEngine, QueryRequest, Record};
//! use tabula_table::{TableConfig, TableView};
//!
//! let config = TableConfig::from_yaml_str(r#"
//! columns:
//!   - key: name
//!     label: Name
//!   - key: role
//!     label: Role
//! presentation:
//!   items_per_page: 2
//! "#).unwrap();
//!
//! let records = vec![
//!     Record::new().with("name", "Ana").with("role", "Admin"),
//!     Record::new().with("name", "Bob").with("role", "Editor"),
//!     Record::new().with("name", "Cy").with("role", "Viewer"),
//! ];
//!
//! let engine = QueryEngine::new(config.columns.clone());
//! let request = QueryRequest::new().page(config.presentation.page_spec(2));
//! let result = engine.execute(&records, &request).unwrap();
//!
//! let view = TableView::project(&result, &config.presentation, &config.columns, 2);
//! assert_eq!(view.labels(), vec!["Name", "Role"]);
//! assert_eq!(view.summary, "Showing 3-3 of 3");
//! ```

mod actions;
mod config;
mod error;
mod message;
mod presentation;
mod selection;
mod view;

pub use actions::{
    ActionRegistry, FnActionProvider, NoActions, ResolvedActions, RowAction, RowActionProvider,
};
pub use config::TableConfig;
pub use error::{ConfigError, Result};
pub use message::{Message, MessageLevel};
pub use presentation::{Density, PaginationPosition, TablePresentationConfig};
pub use selection::RowSelection;
pub use view::{HeaderCell, PaginationInfo, TableRow, TableView, EMPTY_CELL};
