//! Sort specification and sort-key extraction.
//!
//! Sorting is single-column and stable: records whose keys compare equal keep
//! their relative input order in both directions.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::column::ColumnKind;
use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Parses `asc` / `desc`, case-insensitively.
    pub fn parse(s: &str) -> Option<Dir> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Dir::Asc),
            "desc" => Some(Dir::Desc),
            _ => None,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which column to sort by, and in which direction.
///
/// A `None` field keeps the collection order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to sort by.
    #[serde(default)]
    pub field: Option<String>,
    /// Sort direction.
    #[serde(default)]
    pub direction: Dir,
}

impl SortSpec {
    /// No sorting.
    pub fn none() -> Self {
        SortSpec::default()
    }

    /// Ascending sort on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec::by(field, Dir::Asc)
    }

    /// Descending sort on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec::by(field, Dir::Desc)
    }

    /// Sort on a field in the given direction.
    pub fn by(field: impl Into<String>, direction: Dir) -> Self {
        SortSpec {
            field: Some(field.into()),
            direction,
        }
    }

    /// The sort field, ignoring blank names.
    pub fn active_field(&self) -> Option<&str> {
        self.field
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

/// Precomputed sort key for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// Lower-cased text.
    Text(String),
    /// Parsed number; `None` when the value is not numeric.
    Number(Option<f64>),
    /// Milliseconds since the Unix epoch; `None` when unparseable.
    Date(Option<i64>),
}

impl SortKey {
    /// Extracts the key for `field` according to the column kind.
    pub fn extract(record: &Record, field: &str, kind: ColumnKind) -> SortKey {
        let value = record.get(field);
        match kind {
            ColumnKind::Text => SortKey::Text(record.lowercase_text(field)),
            ColumnKind::Numeric => SortKey::Number(value.and_then(Value::as_f64)),
            ColumnKind::Date => SortKey::Date(value.and_then(parse_date_millis)),
        }
    }

    /// Ascending comparison. Missing numbers and dates sort last.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => compare_optional(a, b, |x, y| {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }),
            (SortKey::Date(a), SortKey::Date(b)) => compare_optional(a, b, i64::cmp),
            // Keys of one sort always share a kind.
            _ => Ordering::Equal,
        }
    }
}

fn compare_optional<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse_date_millis(value: &Value) -> Option<i64> {
    let text = value.to_text();
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn dir_parse() {
        assert_eq!(Dir::parse("DESC"), Some(Dir::Desc));
        assert_eq!(Dir::parse(" asc "), Some(Dir::Asc));
        assert_eq!(Dir::parse("up"), None);
    }

    #[test]
    fn sort_spec_active_field() {
        assert_eq!(SortSpec::none().active_field(), None);
        assert_eq!(SortSpec::asc("  ").active_field(), None);
        assert_eq!(SortSpec::desc("name").active_field(), Some("name"));
    }

    #[test]
    fn text_keys_ignore_case() {
        let a = SortKey::extract(&Record::new().with("n", "Ana"), "n", ColumnKind::Text);
        let b = SortKey::extract(&Record::new().with("n", "ana"), "n", ColumnKind::Text);
        let c = SortKey::extract(&Record::new().with("n", "Bob"), "n", ColumnKind::Text);
        assert_eq!(a.compare(&b), Ordering::Equal);
        assert_eq!(a.compare(&c), Ordering::Less);
    }

    #[test]
    fn text_keys_are_lexicographic_for_numbers() {
        let nine = SortKey::extract(&Record::new().with("n", 9), "n", ColumnKind::Text);
        let ten = SortKey::extract(&Record::new().with("n", 10), "n", ColumnKind::Text);
        assert_eq!(nine.compare(&ten), Ordering::Greater);
    }

    #[test]
    fn numeric_keys() {
        let nine = SortKey::extract(&Record::new().with("n", "9"), "n", ColumnKind::Numeric);
        let ten = SortKey::extract(&Record::new().with("n", 10), "n", ColumnKind::Numeric);
        let junk = SortKey::extract(&Record::new().with("n", "n/a"), "n", ColumnKind::Numeric);
        assert_eq!(nine.compare(&ten), Ordering::Less);
        assert_eq!(junk.compare(&nine), Ordering::Greater);
    }

    #[test]
    fn date_keys() {
        let day = SortKey::extract(&Record::new().with("d", "2024-03-01"), "d", ColumnKind::Date);
        let later = SortKey::extract(
            &Record::new().with("d", "2024-03-01T10:00:00Z"),
            "d",
            ColumnKind::Date,
        );
        let missing = SortKey::extract(&Record::new(), "d", ColumnKind::Date);
        assert_eq!(day.compare(&later), Ordering::Less);
        assert_eq!(missing.compare(&day), Ordering::Greater);
    }

    #[test]
    fn sort_spec_serde() {
        let spec: SortSpec = serde_json::from_str(r#"{"field": null, "direction": "desc"}"#).unwrap();
        assert_eq!(spec.field, None);
        assert_eq!(spec.direction, Dir::Desc);
    }
}
