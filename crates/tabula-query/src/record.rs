//! Flat records, the unit the engine operates on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Name of the identity field.
pub const ID_FIELD: &str = "id";

/// An ordered mapping from field name to scalar value.
///
/// Field order is the insertion order, which is also the order records
/// serialize in. Records are treated as immutable once they are part of a
/// collection handed to the engine.
///
/// # Example
///
/// ```
/// use tabula_query::Record;
///
/// let record = Record::new()
///     .with("id", "u-1")
///     .with("name", "Ana")
///     .with("role", "Admin");
///
/// assert_eq!(record.id().as_deref(), Some("u-1"));
/// assert_eq!(record.text("role"), "Admin");
/// assert_eq!(record.text("missing"), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Record::default()
    }

    /// Builder-style field insertion.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the string form of a field, or `""` when absent.
    pub fn text(&self, field: &str) -> String {
        self.get(field)
            .map(|v| v.to_text().into_owned())
            .unwrap_or_default()
    }

    /// Returns the lower-cased string form of a field, or `""` when absent.
    pub fn lowercase_text(&self, field: &str) -> String {
        self.get(field)
            .map(Value::to_lowercase_text)
            .unwrap_or_default()
    }

    /// Returns the identity field as text.
    pub fn id(&self) -> Option<String> {
        self.get(ID_FIELD)
            .filter(|v| !v.is_null())
            .map(|v| v.to_text().into_owned())
    }

    /// Returns `true` if the record has the field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overwrites fields with those of `patch`. New fields are appended.
    pub fn merge(&mut self, patch: Record) {
        self.fields.extend(patch.fields);
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Conversion from typed domain objects into records.
///
/// Implement this for the structs a caller browses (tickets, courses,
/// users...) so a typed collection can be loaded into the engine.
///
/// ```
/// use tabula_query::{IntoRecord, Record};
///
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// impl IntoRecord for User {
///     fn into_record(self) -> Record {
///         Record::new().with("id", self.id).with("name", self.name)
///     }
/// }
///
/// let records = tabula_query::records_from(vec![User { id: 1, name: "Ana".into() }]);
/// assert_eq!(records[0].text("id"), "1");
/// ```
pub trait IntoRecord {
    /// Converts `self` into a flat record.
    fn into_record(self) -> Record;
}

impl IntoRecord for Record {
    fn into_record(self) -> Record {
        self
    }
}

/// Converts a collection of typed items into records, preserving order.
pub fn records_from<I>(items: I) -> Vec<Record>
where
    I: IntoIterator,
    I::Item: IntoRecord,
{
    items.into_iter().map(IntoRecord::into_record).collect()
}
