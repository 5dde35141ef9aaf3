//! Per-row context actions.
//!
//! A column can carry a [`RowActionProvider`] that offers actions for the
//! record in each row. Providers are bound to column keys in an
//! [`ActionRegistry`] and resolved once against the [`ColumnRegistry`];
//! rendering then walks the resolved list and never looks providers up by
//! key.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabula_query::{ColumnRegistry, Record};

use crate::error::{ConfigError, Result};

/// An action that can be taken on one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAction {
    /// Display label (e.g. "Edit").
    pub label: String,
    /// Command to run (e.g. "users update 42").
    pub command: String,
}

impl RowAction {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        RowAction {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// Supplies context actions for records.
pub trait RowActionProvider: Send + Sync {
    /// Whether this provider ever offers actions.
    ///
    /// Providers returning `false` are dropped at resolution time.
    fn has_context_actions(&self) -> bool {
        true
    }

    /// Actions available for one record.
    fn actions_for(&self, record: &Record) -> Vec<RowAction>;
}

/// A provider backed by a closure.
///
/// ```rust
/// use tabula_query::Record;
/// use tabula_table::{FnActionProvider, RowAction, RowActionProvider};
///
/// let edit = FnActionProvider::new(|record: &Record| {
///     vec![RowAction::new("Edit", format!("users edit {}", record.text("id")))]
/// });
/// let actions = edit.actions_for(&Record::new().with("id", 7));
/// assert_eq!(actions[0].command, "users edit 7");
/// ```
pub struct FnActionProvider<F> {
    f: F,
}

impl<F> FnActionProvider<F>
where
    F: Fn(&Record) -> Vec<RowAction> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnActionProvider { f }
    }
}

impl<F> RowActionProvider for FnActionProvider<F>
where
    F: Fn(&Record) -> Vec<RowAction> + Send + Sync,
{
    fn actions_for(&self, record: &Record) -> Vec<RowAction> {
        (self.f)(record)
    }
}

impl<F> fmt::Debug for FnActionProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnActionProvider").finish_non_exhaustive()
    }
}

/// A provider that never offers actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActions;

impl RowActionProvider for NoActions {
    fn has_context_actions(&self) -> bool {
        false
    }

    fn actions_for(&self, _record: &Record) -> Vec<RowAction> {
        Vec::new()
    }
}

/// Column-key to provider bindings, before validation.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    bindings: Vec<(String, Arc<dyn RowActionProvider>)>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        ActionRegistry::default()
    }

    /// Binds a provider to a column. A later binding for the same key replaces
    /// the earlier one.
    pub fn bind(mut self, column: impl Into<String>, provider: impl RowActionProvider + 'static) -> Self {
        let column = column.into();
        self.bindings.retain(|(key, _)| *key != column);
        self.bindings.push((column, Arc::new(provider)));
        self
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Validates bindings against the column registry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownColumn`] if a binding names a column that is not
    /// registered.
    pub fn resolve(&self, registry: &ColumnRegistry) -> Result<ResolvedActions> {
        if let Some((key, _)) = self.bindings.iter().find(|(key, _)| !registry.contains(key)) {
            return Err(ConfigError::UnknownColumn { key: key.clone() });
        }

        let entries = registry
            .keys()
            .filter_map(|key| {
                self.bindings
                    .iter()
                    .find(|(bound, _)| bound == key)
                    .filter(|(_, provider)| provider.has_context_actions())
                    .map(|(bound, provider)| (bound.clone(), Arc::clone(provider)))
            })
            .collect();
        Ok(ResolvedActions { entries })
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|(key, _)| key))
            .finish()
    }
}

/// Providers that offer actions, in column registry order.
#[derive(Clone, Default)]
pub struct ResolvedActions {
    entries: Vec<(String, Arc<dyn RowActionProvider>)>,
}

impl ResolvedActions {
    /// Returns true if any column offers actions.
    pub fn has_context_actions(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Column keys that offer actions.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// The provider for one column, if it offers actions.
    pub fn for_column(&self, key: &str) -> Option<&dyn RowActionProvider> {
        self.entries
            .iter()
            .find(|(bound, _)| bound == key)
            .map(|(_, provider)| provider.as_ref())
    }

    /// All actions for a record, grouped by column in registry order.
    pub fn actions_for(&self, record: &Record) -> Vec<RowAction> {
        self.entries
            .iter()
            .flat_map(|(_, provider)| provider.actions_for(record))
            .collect()
    }
}

impl fmt::Debug for ResolvedActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_query::ColumnDescriptor;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::new([
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("email", "Email"),
        ])
        .unwrap()
    }

    fn edit() -> impl RowActionProvider {
        FnActionProvider::new(|r: &Record| vec![RowAction::new("Edit", format!("edit {}", r.text("id")))])
    }

    fn mail() -> impl RowActionProvider {
        FnActionProvider::new(|r: &Record| vec![RowAction::new("Mail", format!("mail {}", r.text("email")))])
    }

    #[test]
    fn resolves_in_registry_order() {
        let resolved = ActionRegistry::new()
            .bind("email", mail())
            .bind("id", edit())
            .resolve(&registry())
            .unwrap();

        assert!(resolved.has_context_actions());
        assert_eq!(resolved.columns().collect::<Vec<_>>(), vec!["id", "email"]);

        let record = Record::new().with("id", 3).with("email", "a@b.c");
        let commands: Vec<_> = resolved
            .actions_for(&record)
            .into_iter()
            .map(|a| a.command)
            .collect();
        assert_eq!(commands, vec!["edit 3", "mail a@b.c"]);
    }

    #[test]
    fn unknown_column_is_rejected_at_resolution() {
        let err = ActionRegistry::new()
            .bind("salary", edit())
            .resolve(&registry())
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn { key } if key == "salary"));
    }

    #[test]
    fn providers_without_actions_are_dropped() {
        let resolved = ActionRegistry::new()
            .bind("name", NoActions)
            .resolve(&registry())
            .unwrap();
        assert!(!resolved.has_context_actions());
        assert!(resolved.for_column("name").is_none());
        assert!(resolved.actions_for(&Record::new()).is_empty());
    }

    #[test]
    fn later_binding_replaces_earlier() {
        let bindings = ActionRegistry::new().bind("id", edit()).bind("id", NoActions);
        assert_eq!(bindings.len(), 1);
        let resolved = bindings.resolve(&registry()).unwrap();
        assert!(!resolved.has_context_actions());
    }
}
