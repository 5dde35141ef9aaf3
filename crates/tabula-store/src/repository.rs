//! Record repositories.
//!
//! A repository owns a record collection and hands out immutable
//! [`Snapshot`]s. Queries always run against a snapshot, so they never see a
//! half-applied write. Writers build a complete new snapshot and publish it
//! with a pointer swap; snapshots taken earlier stay valid and unchanged.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tabula_query::{QueryEngine, QueryRequest, QueryResult, Record, ID_FIELD};

use crate::error::{Result, StoreError};

/// Owns a record collection and serializes writes to it.
///
/// Implementations must be safe to share between threads. Every write
/// publishes a new snapshot; in-flight readers keep the one they took.
pub trait RecordRepository: Send + Sync {
    /// The current snapshot.
    fn snapshot(&self) -> Result<Snapshot>;

    /// Retrieves a record by id, returning `None` if not found.
    fn get(&self, id: &str) -> Result<Option<Record>> {
        Ok(self.snapshot()?.get(id).cloned())
    }

    /// Retrieves a record by id, returning [`StoreError::NotFound`] if absent.
    fn resolve(&self, id: &str) -> Result<Record> {
        self.get(id)?.ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    /// Merges `patch` into an existing record and returns the updated record.
    ///
    /// The id is immutable: a patch may repeat it but not change it.
    fn update(&self, id: &str, patch: Record) -> Result<Record>;

    /// Appends a record. The record must have a fresh id.
    fn insert(&self, record: Record) -> Result<()>;

    /// Removes a record and returns it.
    fn remove(&self, id: &str) -> Result<Record>;

    /// Replaces the whole collection.
    fn replace_all(&self, records: Vec<Record>) -> Result<Snapshot>;

    /// Runs a query against the current snapshot.
    fn query(&self, engine: &QueryEngine, request: &QueryRequest) -> Result<QueryResult> {
        let snapshot = self.snapshot()?;
        Ok(engine.execute(snapshot.records(), request)?)
    }
}

/// An immutable, cheaply clonable view of a record collection.
#[derive(Debug, Clone)]
pub struct Snapshot {
    inner: Arc<SnapshotInner>,
}

#[derive(Debug, Default)]
struct SnapshotInner {
    records: Vec<Record>,
    index: HashMap<String, usize>,
    version: u64,
}

impl Snapshot {
    /// An empty snapshot at version 0.
    pub fn empty() -> Self {
        Snapshot {
            inner: Arc::new(SnapshotInner::default()),
        }
    }

    /// Builds a snapshot, indexing records by id.
    ///
    /// Records without an id are kept but cannot be addressed by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateId`] if two records share an id.
    pub fn build(records: Vec<Record>, version: u64) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if let Some(id) = record.id() {
                if index.insert(id.clone(), pos).is_some() {
                    return Err(StoreError::DuplicateId { id });
                }
            }
        }
        Ok(Snapshot {
            inner: Arc::new(SnapshotInner {
                records,
                index,
                version,
            }),
        })
    }

    /// Records in collection order.
    pub fn records(&self) -> &[Record] {
        &self.inner.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.position(id).map(|pos| &self.inner.records[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.index.contains_key(id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.inner.index.get(id).copied()
    }

    /// Publication counter; every write increments it.
    pub fn version(&self) -> u64 {
        self.inner.version
    }

    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::empty()
    }
}

/// Copy-on-write repository.
///
/// Readers take the current snapshot under a short read lock (an `Arc`
/// clone). Writers hold a single writer mutex while they copy the collection,
/// apply the change and swap the new snapshot in, so concurrent writes are
/// applied one at a time and never lost.
///
/// # Example
///
/// ```rust
/// use tabula_query::Record;
/// use tabula_store::{RecordRepository, SnapshotRepository};
///
/// let repo = SnapshotRepository::new(vec![
///     Record::new().with("id", "t-1").with("status", "open"),
/// ])
/// .unwrap();
///
/// let before = repo.snapshot().unwrap();
/// repo.update("t-1", Record::new().with("status", "closed")).unwrap();
///
/// assert_eq!(before.get("t-1").unwrap().text("status"), "open");
/// assert_eq!(repo.resolve("t-1").unwrap().text("status"), "closed");
/// ```
#[derive(Debug, Default)]
pub struct SnapshotRepository {
    current: RwLock<Snapshot>,
    writer: Mutex<()>,
}

impl SnapshotRepository {
    /// Creates a repository holding `records` at version 0.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        Ok(SnapshotRepository {
            current: RwLock::new(Snapshot::build(records, 0)?),
            writer: Mutex::new(()),
        })
    }

    /// Applies `change` to a copy of the current records and publishes the
    /// result.
    fn write<T>(&self, change: impl FnOnce(&Snapshot, &mut Vec<Record>) -> Result<T>) -> Result<T> {
        let _guard = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        let current = self.snapshot()?;
        let mut records = current.records().to_vec();
        let out = change(&current, &mut records)?;
        self.publish(Snapshot::build(records, current.version() + 1)?)?;
        Ok(out)
    }

    fn publish(&self, snapshot: Snapshot) -> Result<()> {
        tracing::info!(
            version = snapshot.version(),
            records = snapshot.len(),
            "published snapshot"
        );
        *self.current.write().map_err(|_| StoreError::Poisoned)? = snapshot;
        Ok(())
    }
}

impl RecordRepository for SnapshotRepository {
    fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.current.read().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn update(&self, id: &str, patch: Record) -> Result<Record> {
        // The id may be repeated in a patch but never changed or cleared.
        if let Some(value) = patch.get(ID_FIELD) {
            if value.is_null() || value.to_text() != id {
                return Err(StoreError::IdImmutable {
                    id: id.to_string(),
                    attempted: value.to_text().into_owned(),
                });
            }
        }
        self.write(|current, records| {
            let pos = current
                .position(id)
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
            records[pos].merge(patch);
            Ok(records[pos].clone())
        })
    }

    fn insert(&self, record: Record) -> Result<()> {
        let id = record.id().ok_or(StoreError::MissingId)?;
        self.write(|current, records| {
            if current.contains(&id) {
                return Err(StoreError::DuplicateId { id });
            }
            records.push(record);
            Ok(())
        })
    }

    fn remove(&self, id: &str) -> Result<Record> {
        self.write(|current, records| {
            let pos = current
                .position(id)
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
            Ok(records.remove(pos))
        })
    }

    fn replace_all(&self, records: Vec<Record>) -> Result<Snapshot> {
        let _guard = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        let version = self.snapshot()?.version() + 1;
        let snapshot = Snapshot::build(records, version)?;
        self.publish(snapshot.clone())?;
        Ok(snapshot)
    }
}
