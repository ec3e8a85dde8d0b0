//! Namespace and mount-migration conventions for provider resources.
//!
//! Builds on [`resource_schema_core`] with the pieces that many resource
//! definitions in a provider share:
//!
//! - [`namespace_field`] / [`merge_namespace_field`] — the standard
//!   `namespace` field, validated to have no leading or trailing `/`.
//! - [`namespace_path_customize_diff`] — a plan-time hook that forces
//!   replacement when the stored namespace path no longer matches the
//!   provider namespace joined with the configured one.
//! - [`add_mount_migration_support`] — adds the `disable_remount` guard field
//!   and, by default, a version 0 state upgrader that fills it in.
//! - [`ProviderConfig`] / [`ProviderContext`] — YAML provider configuration
//!   and the metadata hooks read the parent namespace from.
//!
//! # Quick start
//!
//! ```
//! use resource_schema_core::*;
//! use resource_schema_provider::*;
//!
//! let mut fields = FieldMap::new();
//! fields.insert("path".into(), FieldSchema::required(ValueType::String));
//! merge_namespace_field(&mut fields);
//!
//! let mount = ResourceSchema::new(fields)
//!     .with_customize_diff(namespace_path_customize_diff());
//!
//! let mut resources = ResourceMap::new();
//! resources.insert("mount".into(), mount);
//!
//! let with_migration = |r: ResourceSchema| add_mount_migration_support(r, false);
//! let schema = ProviderSchema::builder()
//!     .provider_fields(namespace_schema())
//!     .unwrap()
//!     .resources(resources, Some(&with_migration))
//!     .unwrap()
//!     .build();
//!
//! let mount = schema.resource("mount").unwrap();
//! assert_eq!(mount.schema_version, 1);
//! assert!(mount.has_field(FIELD_DISABLE_REMOUNT));
//! assert!(mount.has_field(FIELD_NAMESPACE));
//! ```

mod config;
mod consts;
mod context;
mod error;
mod mount;
mod namespace;

pub use config::ProviderConfig;
pub use consts::{FIELD_DISABLE_REMOUNT, FIELD_NAMESPACE};
pub use context::{NamespaceClient, ProviderContext};
pub use error::{ConfigError, Result};
pub use mount::{
    add_mount_migration_support, default_disable_remount_state_upgraders,
    disable_remount_resource_v0, try_add_mount_migration_support, upgrade_disable_remount_v0,
};
pub use namespace::{
    NamespacePathPolicy, merge_namespace_field, namespace_field, namespace_path_customize_diff,
    namespace_schema, try_merge_namespace_field,
};
