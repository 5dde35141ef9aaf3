//! Filter conditions as callers submit them.
//!
//! A [`FilterCondition`] keeps the loose wire shape: operator and conjunction
//! are plain strings so that a request can carry whatever a filter-builder UI
//! produced. Validation happens when the chain is compiled (see
//! [`ConditionChain::compile`](crate::ConditionChain::compile)).

use serde::{Deserialize, Serialize};

use crate::op::{Conjunction, Operator};

/// One predicate in an advanced filter chain.
///
/// The `conjunction` stored on a condition links it to the *next* condition
/// in the chain; on the last condition it is unused.
///
/// # Example
///
/// ```
/// use tabula_query::{FilterCondition, Operator};
///
/// let chain = vec![
///     FilterCondition::new("role", Operator::Equals, "Admin").or(),
///     FilterCondition::new("role", Operator::Equals, "Editor"),
/// ];
/// assert_eq!(chain[0].conjunction.as_deref(), Some("OR"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Record field to inspect.
    #[serde(default)]
    pub field: String,
    /// Operator name (`contains`, `equals`, ...).
    #[serde(default)]
    pub operator: String,
    /// Comparison value.
    #[serde(default)]
    pub value: String,
    /// Link to the next condition (`AND` / `OR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conjunction: Option<String>,
}

impl FilterCondition {
    /// Creates a condition with no conjunction.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        FilterCondition {
            field: field.into(),
            operator: operator.as_str().to_string(),
            value: value.into(),
            conjunction: None,
        }
    }

    /// Creates a condition from raw wire strings.
    pub fn raw(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        FilterCondition {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            conjunction: None,
        }
    }

    /// Links this condition to the next one with AND.
    pub fn and(self) -> Self {
        self.linked(Conjunction::And)
    }

    /// Links this condition to the next one with OR.
    pub fn or(self) -> Self {
        self.linked(Conjunction::Or)
    }

    /// Links this condition to the next one with the given conjunction.
    pub fn linked(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = Some(conjunction.as_str().to_string());
        self
    }

    /// Returns `true` if the condition participates in evaluation.
    ///
    /// A condition with an empty field, empty operator, or empty/whitespace
    /// value is inactive and dropped before evaluation.
    pub fn is_active(&self) -> bool {
        !self.field.trim().is_empty()
            && !self.operator.trim().is_empty()
            && !self.value.trim().is_empty()
    }
}

/// Returns `true` if any condition in the slice is active.
pub fn has_active(conditions: &[FilterCondition]) -> bool {
    conditions.iter().any(FilterCondition::is_active)
}
