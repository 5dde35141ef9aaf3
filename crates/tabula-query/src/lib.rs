//! Tabula query - search, filter, sort and paginate record collections.
//!
//! A record is an ordered map of field names to scalar [`Value`]s. A
//! [`QueryEngine`] runs a [`QueryRequest`] against a slice of records and
//! returns one page of matches plus the total match count.
//!
//! # Quick Start
//!
//! ```rust
//! use tabula_query::{
//!     ColumnDescriptor, ColumnRegistry, FilterCondition, Operator, PageSpec, QueryEngine,
//!     QueryRequest, Record, SortSpec,
//! };
//!
//! let registry = ColumnRegistry::new([
//!     ColumnDescriptor::new("id", "ID").searchable(false),
//!     ColumnDescriptor::new("name", "Name"),
//!     ColumnDescriptor::new("email", "Email"),
//!     ColumnDescriptor::new("role", "Role"),
//! ])
//! .unwrap();
//!
//! let users = vec![
//!     Record::new().with("id", 1).with("name", "Ana").with("email", "ana@example.com").with("role", "Admin"),
//!     Record::new().with("id", 2).with("name", "Bob").with("email", "bob@corp.io").with("role", "Editor"),
//!     Record::new().with("id", 3).with("name", "Cy").with("email", "cy@example.com").with("role", "Viewer"),
//! ];
//!
//! let engine = QueryEngine::new(registry);
//! let request = QueryRequest::new()
//!     .search("example")
//!     .filter(FilterCondition::new("role", Operator::NotEquals, "viewer"))
//!     .sort(SortSpec::asc("name"))
//!     .page(PageSpec::new(0, 20));
//!
//! let result = engine.execute(&users, &request).unwrap();
//! assert_eq!(result.total, 1);
//! assert_eq!(result.ids(), vec!["1"]);
//! ```
//!
//! # Filter Chains
//!
//! Advanced filters are evaluated strictly left to right. Each condition's
//! conjunction links it to the *next* condition:
//!
//! ```text
//! acc = eval(c0)
//! acc = conj(c0)(acc, eval(c1))
//! acc = conj(c1)(acc, eval(c2))
//! ...
//! ```
//!
//! There is no operator precedence: `A OR B AND C` means `(A OR B) AND C`.
//! A missing or unrecognised conjunction means AND. Conditions with a blank
//! field, operator or value are dropped before the chain is built.
//!
//! # Operators
//!
//! | Operator | Matches when the lower-cased field value... |
//! |----------|---------------------------------------------|
//! | `contains` | contains the value |
//! | `not_contains` | does not contain the value |
//! | `equals` | equals the value |
//! | `not_equals` | differs from the value |
//! | `starts_with` | starts with the value |
//! | `ends_with` | ends with the value |
//!
//! All comparisons are case-insensitive. Missing fields compare as the empty
//! string.

mod chain;
mod column;
mod condition;
mod control;
mod engine;
mod error;
mod op;
mod ordering;
mod record;
mod request;
mod result;
mod value;

pub use chain::{fold_links, CompiledCondition, ConditionChain};
pub use column::{ColumnDescriptor, ColumnKind, ColumnRegistry, DuplicateColumn};
pub use condition::{has_active, FilterCondition};
pub use control::{CancellationToken, ExecutionControl};
pub use engine::{EngineOptions, QueryEngine};
pub use error::{QueryError, Result};
pub use op::{Conjunction, Operator};
pub use ordering::{Dir, SortKey, SortSpec};
pub use record::{records_from, IntoRecord, Record, ID_FIELD};
pub use request::{PageSpec, QueryRequest, DEFAULT_LIMIT};
pub use result::{Diagnostic, QueryResult};
pub use value::Value;
