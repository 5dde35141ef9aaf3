//! Filter operators and the conjunctions that link conditions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Comparison operator for a filter condition.
///
/// All operators use case-insensitive string semantics: both sides are
/// compared through their lower-cased string representation, whatever the
/// underlying value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Field contains the value.
    Contains,
    /// Field does not contain the value.
    NotContains,
    /// Field equals the value.
    Equals,
    /// Field differs from the value.
    NotEquals,
    /// Field starts with the value.
    StartsWith,
    /// Field ends with the value.
    EndsWith,
}

impl Operator {
    /// Every recognized operator, in display order.
    pub const ALL: [Operator; 6] = [
        Operator::Contains,
        Operator::NotContains,
        Operator::Equals,
        Operator::NotEquals,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    /// Parses an operator name.
    ///
    /// `field` is only used to make the error message point at the offending
    /// condition.
    pub fn parse(name: &str, field: &str) -> Result<Operator> {
        let trimmed = name.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == trimmed)
            .ok_or_else(|| QueryError::InvalidOperator {
                operator: name.to_string(),
                field: field.to_string(),
            })
    }

    /// Applies the operator to already lower-cased operands.
    pub fn eval(self, item: &str, needle: &str) -> bool {
        match self {
            Operator::Contains => item.contains(needle),
            Operator::NotContains => !item.contains(needle),
            Operator::Equals => item == needle,
            Operator::NotEquals => item != needle,
            Operator::StartsWith => item.starts_with(needle),
            Operator::EndsWith => item.ends_with(needle),
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a condition's result combines with the accumulated chain result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    /// Both sides must hold.
    #[default]
    And,
    /// Either side may hold.
    Or,
}

impl Conjunction {
    /// Resolves a wire conjunction, falling back to `And`.
    ///
    /// Matching is case-insensitive. Missing or unrecognised values resolve
    /// to [`Conjunction::And`].
    pub fn resolve(raw: Option<&str>) -> Conjunction {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("or") => Conjunction::Or,
            Some(s) if s.eq_ignore_ascii_case("and") => Conjunction::And,
            None | Some("") => Conjunction::And,
            Some(other) => {
                tracing::debug!(conjunction = other, "unrecognised conjunction, using AND");
                Conjunction::And
            }
        }
    }

    /// Combines an accumulated result with the next condition's result.
    pub fn combine(self, acc: bool, curr: bool) -> bool {
        match self {
            Conjunction::And => acc && curr,
            Conjunction::Or => acc || curr,
        }
    }

    /// Returns the wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
