//! Field validators and structural resource checks.
//!
//! [`validate_resource`] catches mistakes in a composed resource definition,
//! such as upgraders registered at or above the current schema version or
//! defaults that do not match their field type, before the provider serves
//! any request.
//!
//! # Examples
//!
//! ```
//! use resource_schema_core::*;
//! use serde_json::json;
//!
//! let mut fields = FieldMap::new();
//! fields.insert(
//!     "enabled".into(),
//!     FieldSchema::optional(ValueType::Bool).with_default(json!("yes")),
//! );
//! let errors = validate_resource(&ResourceSchema::new(fields));
//! assert_eq!(errors, vec![SchemaError::DefaultTypeMismatch("enabled".into())]);
//! ```

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{FieldValidationError, SchemaError};
use crate::types::ResourceSchema;

/// Rejects string values that begin or end with `/`.
///
/// # Examples
///
/// ```
/// use resource_schema_core::validate_no_leading_trailing_slashes;
/// use serde_json::json;
///
/// assert!(validate_no_leading_trailing_slashes(&json!("team/sub"), "namespace").is_ok());
/// assert!(validate_no_leading_trailing_slashes(&json!("/team"), "namespace").is_err());
/// ```
pub fn validate_no_leading_trailing_slashes(
    value: &Value,
    key: &str,
) -> Result<(), FieldValidationError> {
    let Some(s) = value.as_str() else {
        return Err(FieldValidationError::NotAString {
            key: key.to_string(),
        });
    };

    if s.starts_with('/') {
        return Err(FieldValidationError::LeadingSlash {
            key: key.to_string(),
            value: s.to_string(),
        });
    }
    if s.ends_with('/') {
        return Err(FieldValidationError::TrailingSlash {
            key: key.to_string(),
            value: s.to_string(),
        });
    }
    Ok(())
}

/// Validates a resource definition.
///
/// Reports every problem found rather than stopping at the first.
pub fn validate_resource(resource: &ResourceSchema) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    for (name, field) in &resource.fields {
        if name.trim().is_empty() {
            errors.push(SchemaError::EmptyFieldName);
            continue;
        }
        let Some(default) = &field.default else {
            continue;
        };
        if field.required {
            errors.push(SchemaError::RequiredWithDefault(name.clone()));
        }
        if !field.value_type.matches(default) {
            errors.push(SchemaError::DefaultTypeMismatch(name.clone()));
        }
    }

    let mut seen = HashSet::new();
    for upgrader in &resource.state_upgraders {
        if upgrader.version >= resource.schema_version {
            errors.push(SchemaError::UpgraderVersionOutOfRange {
                version: upgrader.version,
                schema_version: resource.schema_version,
            });
        }
        if !seen.insert(upgrader.version) {
            errors.push(SchemaError::DuplicateUpgraderVersion(upgrader.version));
        }
    }

    errors
}
