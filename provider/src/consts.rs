//! Field names shared across resource definitions.

/// Namespace the resource lives in, relative to the provider namespace.
pub const FIELD_NAMESPACE: &str = "namespace";

/// Opts a mount resource out of migration on path updates.
pub const FIELD_DISABLE_REMOUNT: &str = "disable_remount";
