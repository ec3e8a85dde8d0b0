//! Error types for schema composition, diff customization, and state upgrades.
//!
//! Composition failures ([`SchemaError`]) describe programmer mistakes made
//! while assembling a provider schema. Diff and upgrade failures
//! ([`DiffError`], [`UpgradeError`]) are ordinary runtime errors handed back
//! to the persistence engine, which aborts only the affected operation.

use thiserror::Error;

/// Structural errors found while composing or validating a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field name is already present in the destination field map.
    #[error("cannot add schema field {0:?}, already exists in the schema map")]
    DuplicateField(String),
    /// A resource type name is already present in the destination resource map.
    #[error("cannot add resource, resource map already contains {0:?}")]
    DuplicateResource(String),
    /// A field was registered under an empty or whitespace-only name.
    #[error("schema field name cannot be empty")]
    EmptyFieldName,
    /// A state upgrader targets a version the resource has already reached.
    #[error("state upgrader for version {version} must be below schema version {schema_version}")]
    UpgraderVersionOutOfRange { version: u32, schema_version: u32 },
    /// Two state upgraders share a source version.
    #[error("duplicate state upgrader for version {0}")]
    DuplicateUpgraderVersion(u32),
    /// A field default does not match the declared field type.
    #[error("default for field {0:?} does not match its type")]
    DefaultTypeMismatch(String),
    /// A required field also declares a default.
    #[error("field {0:?} is required and cannot have a default")]
    RequiredWithDefault(String),
}

/// Errors produced by a field validation function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldValidationError {
    /// The value handed to a string validator was not a string.
    #[error("expected type of {key:?} to be string")]
    NotAString { key: String },
    /// The value starts with a path separator.
    #[error("invalid value {value:?} for {key:?}, contains leading '/'")]
    LeadingSlash { key: String, value: String },
    /// The value ends with a path separator.
    #[error("invalid value {value:?} for {key:?}, contains trailing '/'")]
    TrailingSlash { key: String, value: String },
}

/// Errors returned from diff customization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// `force_new` was requested for a field with no pending change.
    #[error("force_new: no changes for {0:?}")]
    NoChange(String),
    /// The field is not part of the resource being diffed.
    #[error("unknown field {0:?} in resource diff")]
    UnknownField(String),
    /// A customization hook rejected the plan.
    #[error("customize diff failed: {0}")]
    Customize(String),
}

/// Errors returned while upgrading persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    /// No upgrader is registered for a version that must be crossed.
    #[error("no state upgrader registered for version {from}")]
    MissingUpgrader { from: u32 },
    /// The stored state was written by a newer schema than the running one.
    #[error("stored state version {stored} is newer than schema version {current}")]
    VersionAhead { stored: u32, current: u32 },
    /// An upgrade function failed.
    #[error("state upgrade from version {version} failed: {message}")]
    Failed { version: u32, message: String },
}

/// Convenience alias for composition results.
pub type Result<T> = std::result::Result<T, SchemaError>;
