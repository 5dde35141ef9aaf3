//! Tabula store - record repositories with atomically swapped snapshots.
//!
//! The query engine only ever reads an immutable slice of records. This
//! crate owns that slice: a [`RecordRepository`] hands out [`Snapshot`]s for
//! queries and applies writes (`update`, `insert`, `remove`,
//! `replace_all`) by publishing a new snapshot instead of mutating the
//! collection in place.
//!
//! [`SnapshotRepository`] is the in-process implementation: a single-writer
//! mutex serializes writes, and an `RwLock` guards only the pointer swap, so
//! readers never wait for a writer to copy records.

mod error;
mod repository;

pub use error::{Result, StoreError};
pub use repository::{RecordRepository, Snapshot, SnapshotRepository};
