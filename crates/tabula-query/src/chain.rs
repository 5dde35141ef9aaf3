//! Condition chain compilation and evaluation.
//!
//! An advanced filter is a flat list of conditions where each condition
//! carries the conjunction linking it to the next one. The chain is evaluated
//! as a strict left fold:
//!
//! ```text
//! acc = c0
//! acc = acc <link0> c1
//! acc = acc <link1> c2
//! ...
//! ```
//!
//! There is no operator precedence: `[A OR, B AND, C]` means `(A OR B) AND C`,
//! never `A OR (B AND C)`. The chain is never parsed into an expression tree.

use std::collections::BTreeSet;

use crate::column::ColumnRegistry;
use crate::condition::FilterCondition;
use crate::error::Result;
use crate::op::{Conjunction, Operator};
use crate::record::Record;

/// A validated, ready-to-evaluate condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCondition {
    field: String,
    op: Operator,
    needle: String,
    known_field: bool,
}

impl CompiledCondition {
    /// The field this condition inspects.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The parsed operator.
    pub fn operator(&self) -> Operator {
        self.op
    }

    /// The lower-cased comparison value.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Returns `false` when the field is not in the registry.
    pub fn is_known_field(&self) -> bool {
        self.known_field
    }

    /// Evaluates the condition against one record.
    ///
    /// Conditions on unregistered fields never match.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.known_field {
            return false;
        }
        self.op.eval(&record.lowercase_text(&self.field), &self.needle)
    }
}

/// Folds a tagged list left to right.
///
/// Each entry pairs an item with the conjunction linking it to the next
/// entry; the last entry's conjunction is ignored. An empty list is vacuously
/// true.
///
/// `eval` is skipped for an entry only when the link to its left is AND and
/// the accumulator is already false. The fold always continues to the end,
/// because a later OR link can still make the result true.
pub fn fold_links<T>(links: &[(T, Conjunction)], mut eval: impl FnMut(&T) -> bool) -> bool {
    let mut iter = links.iter();
    let Some((first, first_link)) = iter.next() else {
        return true;
    };

    let mut acc = eval(first);
    let mut link = *first_link;
    for (item, next_link) in iter {
        acc = match link {
            Conjunction::And if !acc => false,
            conjunction => conjunction.combine(acc, eval(item)),
        };
        link = *next_link;
    }
    acc
}

/// An ordered list of active conditions with their links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionChain {
    links: Vec<(CompiledCondition, Conjunction)>,
    unknown_fields: Vec<String>,
}

impl ConditionChain {
    /// Compiles raw conditions against the registry.
    ///
    /// Inactive conditions are dropped first, so their conjunctions never
    /// take part. Every remaining operator must be recognized, otherwise the
    /// whole chain fails with [`QueryError::InvalidOperator`]. Conditions on
    /// fields outside the registry compile to always-false and their field
    /// names are reported through [`unknown_fields`](Self::unknown_fields).
    ///
    /// [`QueryError::InvalidOperator`]: crate::QueryError::InvalidOperator
    pub fn compile(conditions: &[FilterCondition], registry: &ColumnRegistry) -> Result<Self> {
        let mut links = Vec::new();
        let mut unknown = BTreeSet::new();

        for condition in conditions.iter().filter(|c| c.is_active()) {
            let field = condition.field.trim();
            let op = Operator::parse(&condition.operator, field)?;
            let known_field = registry.contains(field);
            if !known_field && unknown.insert(field.to_string()) {
                tracing::warn!(field, "filter references unknown field; it matches nothing");
            }

            links.push((
                CompiledCondition {
                    field: field.to_string(),
                    op,
                    needle: condition.value.to_lowercase(),
                    known_field,
                },
                Conjunction::resolve(condition.conjunction.as_deref()),
            ));
        }

        Ok(ConditionChain {
            links,
            unknown_fields: unknown.into_iter().collect(),
        })
    }

    /// Returns `true` if the chain has no active conditions.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of active conditions.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// The compiled conditions with their links to the next condition.
    pub fn links(&self) -> &[(CompiledCondition, Conjunction)] {
        &self.links
    }

    /// Distinct unregistered fields referenced by the chain.
    pub fn unknown_fields(&self) -> &[String] {
        &self.unknown_fields
    }

    /// Evaluates the chain against one record.
    pub fn matches(&self, record: &Record) -> bool {
        fold_links(&self.links, |condition| condition.matches(record))
    }
}
