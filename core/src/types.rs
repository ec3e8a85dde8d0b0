//! Schema type definitions for provider resources.
//!
//! A resource is described by a [`FieldMap`] of named [`FieldSchema`]s, a
//! schema version, the [`StateUpgrader`]s that carry older persisted state
//! forward, and any diff-customization hooks. Everything here is plain data
//! apart from the function pointers and hook objects, which the persistence
//! engine calls back into.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diff::{CustomizeDiff, ProviderMeta, ResourceDiff};
use crate::error::{DiffError, FieldValidationError, UpgradeError};

/// Named field definitions of a single resource or provider block.
pub type FieldMap = BTreeMap<String, FieldSchema>;

/// Resource definitions keyed by resource type name.
pub type ResourceMap = BTreeMap<String, ResourceSchema>;

/// Untyped persisted state, as handed over by the persistence engine.
///
/// Upgraders treat it structurally: they only test for the presence of
/// named keys and never assume the current typed schema.
pub type RawState = serde_json::Map<String, Value>;

/// Validation function attached to a field.
///
/// Receives the configured value and the field key used in messages.
pub type ValidateFn = fn(&Value, &str) -> Result<(), FieldValidationError>;

/// Transform applied to raw state persisted under an older schema version.
pub type UpgradeFn = fn(RawState, &dyn ProviderMeta) -> Result<RawState, UpgradeError>;

/// Value type of a field.
///
/// # Examples
///
/// ```
/// use resource_schema_core::ValueType;
/// use serde_json::json;
///
/// assert!(ValueType::Bool.matches(&json!(false)));
/// assert!(!ValueType::Bool.matches(&json!("false")));
/// assert!(ValueType::List(Box::new(ValueType::Int)).matches(&json!([1, 2])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    /// Ordered collection of elements.
    List(Box<ValueType>),
    /// Unordered collection of unique elements.
    Set(Box<ValueType>),
    /// String-keyed map of elements.
    Map(Box<ValueType>),
}

impl ValueType {
    /// Returns `true` if `value` is a well-formed instance of this type.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Bool, Value::Bool(_)) => true,
            (ValueType::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ValueType::Float, Value::Number(_)) => true,
            (ValueType::String, Value::String(_)) => true,
            (ValueType::List(elem) | ValueType::Set(elem), Value::Array(items)) => {
                items.iter().all(|item| elem.matches(item))
            }
            (ValueType::Map(elem), Value::Object(entries)) => {
                entries.values().all(|item| elem.matches(item))
            }
            _ => false,
        }
    }
}

/// Schema for a single configuration field.
///
/// Use [`optional`](FieldSchema::optional) or [`required`](FieldSchema::required)
/// to create a field, then chain builder methods.
///
/// # Examples
///
/// ```
/// use resource_schema_core::{FieldSchema, ValueType};
/// use serde_json::json;
///
/// let field = FieldSchema::optional(ValueType::Bool)
///     .with_default(json!(false))
///     .with_description("Toggle the thing");
/// assert!(field.optional);
/// assert_eq!(field.default, Some(json!(false)));
/// assert!(!field.force_new);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub value_type: ValueType,
    pub optional: bool,
    pub required: bool,
    /// Set by the provider rather than the user.
    pub computed: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// A change to this field destroys and recreates the resource.
    pub force_new: bool,
    #[serde(skip)]
    pub validate: Option<ValidateFn>,
}

impl FieldSchema {
    fn new(value_type: ValueType, optional: bool, required: bool) -> Self {
        Self {
            value_type,
            optional,
            required,
            computed: false,
            default: None,
            description: None,
            force_new: false,
            validate: None,
        }
    }

    /// Creates an optional field.
    pub fn optional(value_type: ValueType) -> Self {
        Self::new(value_type, true, false)
    }

    /// Creates a required field.
    pub fn required(value_type: ValueType) -> Self {
        Self::new(value_type, false, true)
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks changes to this field as requiring replacement.
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Marks the field as computed.
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Attaches a validation function.
    pub fn with_validator(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Runs the attached validator against `value`.
    ///
    /// Fields without a validator accept every value.
    pub fn validate(&self, key: &str, value: &Value) -> Result<(), FieldValidationError> {
        match self.validate {
            Some(validate) => validate(value, key),
            None => Ok(()),
        }
    }
}

/// A versioned transform for state persisted under `version`.
///
/// `shape` describes the expected legacy state using just the fields the
/// upgrade cares about; it exists for the persistence engine to decode the
/// old record and is never used to validate it here.
#[derive(Clone, Serialize)]
pub struct StateUpgrader {
    pub version: u32,
    pub shape: FieldMap,
    #[serde(skip_serializing)]
    pub upgrade: UpgradeFn,
}

impl StateUpgrader {
    /// Creates an upgrader from `version` to `version + 1`.
    pub fn new(version: u32, shape: FieldMap, upgrade: UpgradeFn) -> Self {
        Self {
            version,
            shape,
            upgrade,
        }
    }

    /// Applies the upgrade function to `state`.
    pub fn apply(&self, state: RawState, meta: &dyn ProviderMeta) -> Result<RawState, UpgradeError> {
        (self.upgrade)(state, meta)
    }

    /// Returns the name → type view of the declared legacy shape.
    pub fn implied_type(&self) -> BTreeMap<String, ValueType> {
        self.shape
            .iter()
            .map(|(name, field)| (name.clone(), field.value_type.clone()))
            .collect()
    }
}

impl fmt::Debug for StateUpgrader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateUpgrader")
            .field("version", &self.version)
            .field("shape", &self.implied_type())
            .finish_non_exhaustive()
    }
}

/// Schema of one manageable resource type.
///
/// # Examples
///
/// ```
/// use resource_schema_core::{FieldMap, FieldSchema, ResourceSchema, ValueType};
///
/// let mut fields = FieldMap::new();
/// fields.insert("path".into(), FieldSchema::required(ValueType::String));
///
/// let resource = ResourceSchema::new(fields).with_description("A mount");
/// assert_eq!(resource.schema_version, 0);
/// assert!(resource.has_field("path"));
/// assert!(resource.state_upgraders.is_empty());
/// ```
#[derive(Clone, Default, Serialize)]
pub struct ResourceSchema {
    pub description: Option<String>,
    pub fields: FieldMap,
    pub schema_version: u32,
    pub state_upgraders: Vec<StateUpgrader>,
    #[serde(skip_serializing)]
    pub customize_diff: Vec<Arc<dyn CustomizeDiff>>,
}

impl ResourceSchema {
    /// Creates a version-0 resource with the given fields.
    pub fn new(fields: FieldMap) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Registers a diff-customization hook.
    pub fn with_customize_diff(mut self, hook: impl CustomizeDiff + 'static) -> Self {
        self.customize_diff.push(Arc::new(hook));
        self
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Returns `true` if the resource defines `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Runs every registered hook in registration order, stopping at the
    /// first error.
    pub fn run_customize_diff(
        &self,
        diff: &mut dyn ResourceDiff,
        meta: &dyn ProviderMeta,
    ) -> Result<(), DiffError> {
        for hook in &self.customize_diff {
            hook.customize(diff, meta)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResourceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSchema")
            .field("description", &self.description)
            .field("fields", &self.fields)
            .field("schema_version", &self.schema_version)
            .field("state_upgraders", &self.state_upgraders)
            .field("customize_diff", &self.customize_diff.len())
            .finish()
    }
}
