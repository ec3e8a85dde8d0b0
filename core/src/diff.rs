//! Collaborator interfaces used at plan time and during state upgrades.
//!
//! The persistence engine owns the real diff and provider objects; this
//! module only names the handful of operations the schema hooks need, so
//! hooks can be exercised against [`PlannedDiff`] or small fakes.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::DiffError;
use crate::types::RawState;

/// Per-plan view of a resource change.
pub trait ResourceDiff {
    /// Returns `true` if `field` differs between prior and planned state.
    fn has_change(&self, field: &str) -> bool;

    /// Returns the `(old, new)` values of `field`, `Null` when unset.
    fn get_change(&self, field: &str) -> (Value, Value);

    /// Marks `field` as requiring the resource to be replaced.
    fn force_new(&mut self, field: &str) -> Result<(), DiffError>;
}

/// Configured API client, reduced to what schema hooks read.
pub trait Client: Send + Sync {
    /// Namespace configured on the provider block, empty when unset.
    fn namespace(&self) -> &str;
}

/// Provider-level metadata passed to every hook and upgrader.
pub trait ProviderMeta: Send + Sync {
    fn client(&self) -> &dyn Client;
}

/// A diff-customization hook registered on a resource.
///
/// Implemented for any matching closure, so small hooks need no type of
/// their own.
pub trait CustomizeDiff: Send + Sync {
    fn customize(
        &self,
        diff: &mut dyn ResourceDiff,
        meta: &dyn ProviderMeta,
    ) -> Result<(), DiffError>;
}

impl<F> CustomizeDiff for F
where
    F: Fn(&mut dyn ResourceDiff, &dyn ProviderMeta) -> Result<(), DiffError> + Send + Sync,
{
    fn customize(
        &self,
        diff: &mut dyn ResourceDiff,
        meta: &dyn ProviderMeta,
    ) -> Result<(), DiffError> {
        (self)(diff, meta)
    }
}

/// In-memory [`ResourceDiff`] between prior and planned raw state.
///
/// Records which fields were forced to replacement so callers can decide
/// between an in-place update and destroy-then-create.
///
/// # Examples
///
/// ```
/// use resource_schema_core::{PlannedDiff, RawState, ResourceDiff};
/// use serde_json::json;
///
/// let mut prior = RawState::new();
/// prior.insert("path".into(), json!("a"));
/// let mut planned = RawState::new();
/// planned.insert("path".into(), json!("b"));
///
/// let mut diff = PlannedDiff::new(prior, planned);
/// assert!(diff.has_change("path"));
/// diff.force_new("path").unwrap();
/// assert!(diff.requires_replace());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlannedDiff {
    prior: RawState,
    planned: RawState,
    forced: BTreeSet<String>,
}

impl PlannedDiff {
    pub fn new(prior: RawState, planned: RawState) -> Self {
        Self {
            prior,
            planned,
            forced: BTreeSet::new(),
        }
    }

    /// Fields marked for replacement so far.
    pub fn forced_fields(&self) -> impl Iterator<Item = &str> {
        self.forced.iter().map(String::as_str)
    }

    /// Returns `true` if any field forces replacement.
    pub fn requires_replace(&self) -> bool {
        !self.forced.is_empty()
    }

    /// Names of every field whose value changed.
    pub fn changed_fields(&self) -> Vec<&str> {
        let mut names: BTreeSet<&str> = self.prior.keys().map(String::as_str).collect();
        names.extend(self.planned.keys().map(String::as_str));
        names.into_iter().filter(|name| self.has_change(name)).collect()
    }
}

impl ResourceDiff for PlannedDiff {
    fn has_change(&self, field: &str) -> bool {
        let (old, new) = self.get_change(field);
        old != new
    }

    fn get_change(&self, field: &str) -> (Value, Value) {
        let old = self.prior.get(field).cloned().unwrap_or(Value::Null);
        let new = self.planned.get(field).cloned().unwrap_or(Value::Null);
        (old, new)
    }

    fn force_new(&mut self, field: &str) -> Result<(), DiffError> {
        if !self.has_change(field) {
            return Err(DiffError::NoChange(field.to_string()));
        }
        self.forced.insert(field.to_string());
        Ok(())
    }
}
