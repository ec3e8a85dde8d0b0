//! Mount-migration support for mount-backed resources.
//!
//! Every resource that can migrate its mount on a path update shares the
//! `disable_remount` guard field. State written before the field existed is
//! carried forward by a version 0 upgrader that fills in `false`.

use resource_schema_core::{
    FieldMap, FieldSchema, ProviderMeta, RawState, ResourceSchema, SchemaError, StateUpgrader,
    UpgradeError, ValueType, try_merge_fields,
};
use serde_json::Value;
use tracing::debug;

use crate::consts::FIELD_DISABLE_REMOUNT;

fn disable_remount_field() -> FieldSchema {
    FieldSchema::optional(ValueType::Bool)
        .with_default(Value::Bool(false))
        .with_description("If set, opts out of mount migration on path updates.")
}

/// Legacy shape of a mount resource as seen by the version 0 upgrader.
pub fn disable_remount_resource_v0() -> FieldMap {
    FieldMap::from([(FIELD_DISABLE_REMOUNT.to_string(), disable_remount_field())])
}

/// Sets `disable_remount` to `false` when state predates the field.
///
/// Never fails. Values already present, including `true`, are kept.
///
/// # Examples
///
/// ```
/// use resource_schema_core::{Client, ProviderMeta, RawState};
/// use resource_schema_provider::upgrade_disable_remount_v0;
/// use serde_json::json;
///
/// struct Anon;
/// impl Client for Anon {
///     fn namespace(&self) -> &str { "" }
/// }
/// impl ProviderMeta for Anon {
///     fn client(&self) -> &dyn Client { self }
/// }
///
/// let upgraded = upgrade_disable_remount_v0(RawState::new(), &Anon).unwrap();
/// assert_eq!(upgraded.get("disable_remount"), Some(&json!(false)));
/// ```
pub fn upgrade_disable_remount_v0(
    mut raw_state: RawState,
    _meta: &dyn ProviderMeta,
) -> Result<RawState, UpgradeError> {
    let value = raw_state
        .entry(FIELD_DISABLE_REMOUNT)
        .or_insert(Value::Null);
    if value.is_null() {
        *value = Value::Bool(false);
    }
    Ok(raw_state)
}

/// Upgraders attached by [`add_mount_migration_support`] by default.
pub fn default_disable_remount_state_upgraders() -> Vec<StateUpgrader> {
    vec![StateUpgrader::new(
        0,
        disable_remount_resource_v0(),
        upgrade_disable_remount_v0,
    )]
}

/// Adds the `disable_remount` field to `resource`, failing if it already
/// defines one.
///
/// Unless `custom_state_upgrade` is set, the resource's upgraders are
/// replaced by the default version 0 upgrader and its schema version is set
/// to 1. Resources with their own upgrade path pass `true` and bump the
/// version themselves.
pub fn try_add_mount_migration_support(
    mut resource: ResourceSchema,
    custom_state_upgrade: bool,
) -> Result<ResourceSchema, SchemaError> {
    try_merge_fields(&mut resource.fields, disable_remount_resource_v0())?;

    if custom_state_upgrade {
        debug!("Skipping default disable_remount state upgrade");
    } else {
        resource.state_upgraders = default_disable_remount_state_upgraders();
        resource.schema_version = 1;
    }

    Ok(resource)
}

/// Adds mount-migration support to `resource`.
///
/// See [`try_add_mount_migration_support`].
///
/// # Panics
///
/// Panics if the resource already defines `disable_remount`.
///
/// # Examples
///
/// ```
/// use resource_schema_core::ResourceSchema;
/// use resource_schema_provider::add_mount_migration_support;
///
/// let resource = add_mount_migration_support(ResourceSchema::default(), false);
/// assert_eq!(resource.schema_version, 1);
/// assert_eq!(resource.state_upgraders[0].version, 0);
/// assert!(resource.has_field("disable_remount"));
/// ```
pub fn add_mount_migration_support(
    resource: ResourceSchema,
    custom_state_upgrade: bool,
) -> ResourceSchema {
    match try_add_mount_migration_support(resource, custom_state_upgrade) {
        Ok(resource) => resource,
        Err(e) => panic!("{e}"),
    }
}
