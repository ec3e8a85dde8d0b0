//! The shared `namespace` field and its recreate policy.
//!
//! Resources may be placed in a namespace nested under the namespace
//! configured on the provider block. Older state stored the fully qualified
//! path (`parent/child`) while newer state stores only the child fragment.
//! [`NamespacePathPolicy`] treats the two as equal when they name the same
//! path and forces replacement otherwise.

use resource_schema_core::{
    CustomizeDiff, DiffError, FieldMap, FieldSchema, ProviderMeta, ResourceDiff, SchemaError,
    ValueType, try_merge_fields, validate_no_leading_trailing_slashes,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::consts::FIELD_NAMESPACE;

/// Returns the standard `namespace` field definition.
///
/// # Examples
///
/// ```
/// use resource_schema_provider::namespace_field;
/// use serde_json::json;
///
/// let field = namespace_field();
/// assert!(field.optional);
/// assert!(field.force_new);
/// assert!(field.validate("namespace", &json!("team/sub")).is_ok());
/// assert!(field.validate("namespace", &json!("team/")).is_err());
/// ```
pub fn namespace_field() -> FieldSchema {
    FieldSchema::optional(ValueType::String)
        .force_new()
        .with_description("Target namespace. (requires Enterprise)")
        .with_validator(validate_no_leading_trailing_slashes)
}

/// Returns a field map holding only the `namespace` field.
pub fn namespace_schema() -> FieldMap {
    FieldMap::from([(FIELD_NAMESPACE.to_string(), namespace_field())])
}

/// Adds the `namespace` field to `dest`, failing if it is already defined.
pub fn try_merge_namespace_field(dest: &mut FieldMap) -> Result<(), SchemaError> {
    try_merge_fields(dest, namespace_schema())
}

/// Adds the `namespace` field to `dest`.
///
/// # Panics
///
/// Panics if `dest` already defines `namespace`.
pub fn merge_namespace_field(dest: &mut FieldMap) {
    if let Err(e) = try_merge_namespace_field(dest) {
        panic!("{e}");
    }
}

/// Diff hook that forces replacement when the stored namespace no longer
/// names the configured path.
///
/// The decision, for a change on `namespace` from `old` to `new`:
///
/// - `old` empty: first-time set, keep the plan.
/// - `old == "{provider namespace}/{new}"`: state holds the fully qualified
///   form of the same path, keep the plan.
/// - anything else: force replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacePathPolicy;

/// Returns the namespace recreate hook, ready to register on a resource.
pub fn namespace_path_customize_diff() -> NamespacePathPolicy {
    NamespacePathPolicy
}

fn path_str(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

impl CustomizeDiff for NamespacePathPolicy {
    fn customize(
        &self,
        diff: &mut dyn ResourceDiff,
        meta: &dyn ProviderMeta,
    ) -> Result<(), DiffError> {
        let field = FIELD_NAMESPACE;
        if !diff.has_change(field) {
            return Ok(());
        }

        let (old, new) = diff.get_change(field);
        let (old, new) = (path_str(&old), path_str(&new));
        if old.is_empty() {
            return Ok(());
        }

        let parent = meta.client().namespace();
        let constructed = format!("{parent}/{new}");
        debug!(
            parent,
            constructed = %constructed,
            old,
            new,
            "Evaluating namespace path change"
        );

        if old == constructed {
            return Ok(());
        }

        info!(old, constructed = %constructed, "Namespace path changed, forcing replacement");
        diff.force_new(field)
    }
}

#[cfg(test)]
mod tests {
    use resource_schema_core::{Client, PlannedDiff, RawState};
    use serde_json::json;

    use super::*;

    struct Parent(&'static str);

    impl Client for Parent {
        fn namespace(&self) -> &str {
            self.0
        }
    }

    impl ProviderMeta for Parent {
        fn client(&self) -> &dyn Client {
            self
        }
    }

    fn diff(old: Option<&str>, new: Option<&str>) -> PlannedDiff {
        let mut prior = RawState::new();
        let mut planned = RawState::new();
        if let Some(old) = old {
            prior.insert(FIELD_NAMESPACE.into(), json!(old));
        }
        if let Some(new) = new {
            planned.insert(FIELD_NAMESPACE.into(), json!(new));
        }
        PlannedDiff::new(prior, planned)
    }

    fn evaluate(parent: &'static str, d: &mut PlannedDiff) -> Result<(), DiffError> {
        namespace_path_customize_diff().customize(d, &Parent(parent))
    }

    #[test]
    fn test_no_change_is_noop() {
        let mut d = diff(Some("team-a"), Some("team-a"));
        assert!(evaluate("root", &mut d).is_ok());
        assert!(!d.requires_replace());
    }

    #[test]
    fn test_first_time_set_is_noop() {
        let mut d = diff(Some(""), Some("team-a"));
        assert!(evaluate("root", &mut d).is_ok());
        assert!(!d.requires_replace());

        let mut d = diff(None, Some("team-a"));
        assert!(evaluate("root", &mut d).is_ok());
        assert!(!d.requires_replace());
    }

    #[test]
    fn test_fully_qualified_state_matches() {
        let mut d = diff(Some("root/team-a"), Some("team-a"));
        assert!(evaluate("root", &mut d).is_ok());
        assert!(!d.requires_replace());
    }

    #[test]
    fn test_path_mismatch_forces_new() {
        let mut d = diff(Some("team-a"), Some("team-b"));
        assert!(evaluate("root", &mut d).is_ok());
        assert_eq!(d.forced_fields().collect::<Vec<_>>(), vec![FIELD_NAMESPACE]);
    }

    #[test]
    fn test_empty_parent_builds_rooted_path() {
        let mut d = diff(Some("/team-a"), Some("team-a"));
        assert!(evaluate("", &mut d).is_ok());
        assert!(!d.requires_replace());
    }

    #[test]
    fn test_unset_new_value_forces_new() {
        let mut d = diff(Some("team-a"), None);
        assert!(evaluate("root", &mut d).is_ok());
        assert!(d.requires_replace());
    }

    #[test]
    fn test_namespace_schema_shape() {
        let schema = namespace_schema();
        assert_eq!(schema.len(), 1);
        let field = &schema[FIELD_NAMESPACE];
        assert_eq!(field.value_type, ValueType::String);
        assert!(!field.required);
        assert_eq!(
            field.description.as_deref(),
            Some("Target namespace. (requires Enterprise)")
        );
    }

    #[test]
    fn test_merge_namespace_field_collides() {
        let mut dest = FieldMap::new();
        merge_namespace_field(&mut dest);
        assert_eq!(
            try_merge_namespace_field(&mut dest),
            Err(SchemaError::DuplicateField(FIELD_NAMESPACE.into()))
        );
    }
}
