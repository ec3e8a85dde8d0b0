//! Core schema types and composition primitives for provider resources.
//!
//! This crate defines the generic schema representation shared by every
//! resource in a provider:
//!
//! - [`FieldSchema`] — one configurable attribute (type, optionality,
//!   default, validation, force-new behavior).
//! - [`ResourceSchema`] — a resource type: its [`FieldMap`], schema version,
//!   [`StateUpgrader`]s, and diff-customization hooks.
//! - [`ProviderSchema`] — the composed, immutable provider schema built by
//!   [`ProviderSchemaBuilder`].
//!
//! Composition ([`merge_fields`], [`merge_resources`]) rejects duplicate
//! names. The panicking forms treat a duplicate as a fatal assembly mistake;
//! the `try_*` forms and the builder report it as a [`SchemaError`].
//!
//! At plan and refresh time the persistence engine calls back through the
//! [`ResourceDiff`], [`ProviderMeta`], and [`Client`] traits, and carries old
//! state forward with [`upgrade_state`].
//!
//! # Example
//!
//! ```
//! use resource_schema_core::*;
//! use serde_json::json;
//!
//! let mut fields = FieldMap::new();
//! fields.insert("path".into(), FieldSchema::required(ValueType::String).force_new());
//!
//! let mut mount = ResourceSchema::new(fields);
//! merge_resource_fields(&mut mount, {
//!     let mut extra = FieldMap::new();
//!     extra.insert(
//!         "local".into(),
//!         FieldSchema::optional(ValueType::Bool).with_default(json!(false)),
//!     );
//!     extra
//! });
//!
//! let mut resources = ResourceMap::new();
//! resources.insert("mount".into(), mount);
//!
//! let schema = ProviderSchema::builder()
//!     .resources(resources, None)
//!     .unwrap()
//!     .build();
//! let mount = schema.resource("mount").unwrap();
//! assert!(mount.has_field("local"));
//! assert!(validate_resource(mount).is_empty());
//! ```

mod diff;
mod error;
mod merge;
mod types;
mod upgrade;
mod validate;

pub use diff::{Client, CustomizeDiff, PlannedDiff, ProviderMeta, ResourceDiff};
pub use error::{DiffError, FieldValidationError, Result, SchemaError, UpgradeError};
pub use merge::{
    ProviderSchema, ProviderSchemaBuilder, merge_fields, merge_resource_fields, merge_resources,
    try_insert_field, try_merge_fields, try_merge_resources,
};
pub use types::*;
pub use upgrade::upgrade_state;
pub use validate::{validate_no_leading_trailing_slashes, validate_resource};
