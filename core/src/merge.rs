//! Collision-checked schema composition.
//!
//! Independently authored resources contribute fields and nested resource
//! definitions into shared maps. A name defined twice is a mistake made while
//! assembling the provider, so the `merge_*` entry points abort with a
//! message naming the key. The `try_merge_*` twins and
//! [`ProviderSchemaBuilder`] return the same failure as a [`SchemaError`].
//!
//! # Example
//!
//! ```
//! use resource_schema_core::*;
//!
//! let mut fields = FieldMap::new();
//! fields.insert("path".into(), FieldSchema::required(ValueType::String));
//!
//! let mut extra = FieldMap::new();
//! extra.insert("description".into(), FieldSchema::optional(ValueType::String));
//!
//! merge_fields(&mut fields, extra);
//! assert_eq!(fields.len(), 2);
//! ```

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::types::{FieldMap, FieldSchema, ResourceMap, ResourceSchema};

/// Inserts `field` under `name`, failing if the name is taken.
pub fn try_insert_field(dest: &mut FieldMap, name: String, field: FieldSchema) -> Result<()> {
    if dest.contains_key(&name) {
        return Err(SchemaError::DuplicateField(name));
    }
    debug!(field = %name, "Adding schema field");
    dest.insert(name, field);
    Ok(())
}

/// Merges `contributions` into `dest`, stopping at the first collision.
///
/// Collisions are checked against everything already in `dest`. Entries
/// processed before the colliding one stay inserted.
///
/// # Examples
///
/// ```
/// use resource_schema_core::*;
///
/// let mut dest = FieldMap::new();
/// dest.insert("path".into(), FieldSchema::required(ValueType::String));
///
/// let mut dup = FieldMap::new();
/// dup.insert("path".into(), FieldSchema::optional(ValueType::String));
///
/// let err = try_merge_fields(&mut dest, dup).unwrap_err();
/// assert_eq!(err, SchemaError::DuplicateField("path".into()));
/// ```
pub fn try_merge_fields(dest: &mut FieldMap, contributions: FieldMap) -> Result<()> {
    for (name, field) in contributions {
        try_insert_field(dest, name, field)?;
    }
    Ok(())
}

/// Merges `contributions` into `dest`.
///
/// # Panics
///
/// Panics if any contributed name already exists in `dest`.
pub fn merge_fields(dest: &mut FieldMap, contributions: FieldMap) {
    if let Err(e) = try_merge_fields(dest, contributions) {
        panic!("{e}");
    }
}

/// Merges `contributions` into the field map of `resource`.
///
/// # Panics
///
/// Panics if any contributed name is already defined on the resource.
pub fn merge_resource_fields(resource: &mut ResourceSchema, contributions: FieldMap) {
    merge_fields(&mut resource.fields, contributions);
}

/// Merges resource definitions into `dest`, applying `transform` to each
/// definition before its name is checked.
///
/// # Examples
///
/// ```
/// use resource_schema_core::*;
///
/// let mut dest = ResourceMap::new();
/// let mut contributions = ResourceMap::new();
/// contributions.insert("kv_mount".into(), ResourceSchema::default());
///
/// let bump = |mut r: ResourceSchema| {
///     r.schema_version += 1;
///     r
/// };
/// try_merge_resources(&mut dest, contributions, Some(&bump)).unwrap();
/// assert_eq!(dest["kv_mount"].schema_version, 1);
/// ```
pub fn try_merge_resources(
    dest: &mut ResourceMap,
    contributions: ResourceMap,
    transform: Option<&dyn Fn(ResourceSchema) -> ResourceSchema>,
) -> Result<()> {
    for (name, resource) in contributions {
        let resource = match transform {
            Some(f) => f(resource),
            None => resource,
        };
        if dest.contains_key(&name) {
            return Err(SchemaError::DuplicateResource(name));
        }
        debug!(resource = %name, version = resource.schema_version, "Registering resource");
        dest.insert(name, resource);
    }
    Ok(())
}

/// Merges resource definitions into `dest`.
///
/// # Panics
///
/// Panics if any contributed resource type name already exists in `dest`.
pub fn merge_resources(
    dest: &mut ResourceMap,
    contributions: ResourceMap,
    transform: Option<&dyn Fn(ResourceSchema) -> ResourceSchema>,
) {
    if let Err(e) = try_merge_resources(dest, contributions, transform) {
        panic!("{e}");
    }
}

/// Composed, immutable provider schema.
#[derive(Debug, Clone, Default)]
pub struct ProviderSchema {
    provider_fields: FieldMap,
    resources: ResourceMap,
    data_sources: ResourceMap,
}

impl ProviderSchema {
    /// Starts a new composition.
    pub fn builder() -> ProviderSchemaBuilder {
        ProviderSchemaBuilder::default()
    }

    /// Fields of the provider configuration block.
    pub fn provider_fields(&self) -> &FieldMap {
        &self.provider_fields
    }

    pub fn resources(&self) -> &ResourceMap {
        &self.resources
    }

    pub fn data_sources(&self) -> &ResourceMap {
        &self.data_sources
    }

    /// Looks up a managed resource by type name.
    pub fn resource(&self, name: &str) -> Option<&ResourceSchema> {
        self.resources.get(name)
    }

    /// Looks up a data source by type name.
    pub fn data_source(&self, name: &str) -> Option<&ResourceSchema> {
        self.data_sources.get(name)
    }
}

/// Builder that composes a [`ProviderSchema`] from many contributions.
///
/// Each step fails fast on the first duplicate name.
///
/// # Examples
///
/// ```
/// use resource_schema_core::*;
///
/// let mut auth = ResourceMap::new();
/// auth.insert("auth_backend".into(), ResourceSchema::default());
/// let mut secrets = ResourceMap::new();
/// secrets.insert("mount".into(), ResourceSchema::default());
///
/// let schema = ProviderSchema::builder()
///     .resources(auth, None)
///     .and_then(|b| b.resources(secrets, None))
///     .unwrap()
///     .build();
/// assert_eq!(schema.resources().len(), 2);
///
/// let mut again = ResourceMap::new();
/// again.insert("mount".into(), ResourceSchema::default());
/// let err = ProviderSchema::builder()
///     .resources(again.clone(), None)
///     .and_then(|b| b.resources(again, None))
///     .unwrap_err();
/// assert_eq!(err, SchemaError::DuplicateResource("mount".into()));
/// ```
#[derive(Debug, Default)]
pub struct ProviderSchemaBuilder {
    schema: ProviderSchema,
}

impl ProviderSchemaBuilder {
    /// Adds fields to the provider configuration block.
    pub fn provider_fields(mut self, fields: FieldMap) -> Result<Self> {
        try_merge_fields(&mut self.schema.provider_fields, fields)?;
        Ok(self)
    }

    /// Adds managed resources, transforming each one first if requested.
    pub fn resources(
        mut self,
        resources: ResourceMap,
        transform: Option<&dyn Fn(ResourceSchema) -> ResourceSchema>,
    ) -> Result<Self> {
        try_merge_resources(&mut self.schema.resources, resources, transform)?;
        Ok(self)
    }

    /// Adds data sources, transforming each one first if requested.
    pub fn data_sources(
        mut self,
        data_sources: ResourceMap,
        transform: Option<&dyn Fn(ResourceSchema) -> ResourceSchema>,
    ) -> Result<Self> {
        try_merge_resources(&mut self.schema.data_sources, data_sources, transform)?;
        Ok(self)
    }

    /// Finishes composition.
    pub fn build(self) -> ProviderSchema {
        self.schema
    }
}
