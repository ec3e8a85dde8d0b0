//! Chained state upgrades.
//!
//! State persisted under version `n` is carried to the resource's current
//! schema version by applying the upgrader registered for `n`, then `n + 1`,
//! and so on. Each gap is crossed exactly once.

use tracing::{debug, trace};

use crate::diff::ProviderMeta;
use crate::error::UpgradeError;
use crate::types::{RawState, ResourceSchema};

/// Upgrades `state` written under `stored_version` to the current version of
/// `resource`.
///
/// State already at the current version is returned unchanged.
///
/// # Errors
///
/// Returns [`UpgradeError::VersionAhead`] if the stored version is newer than
/// the schema, [`UpgradeError::MissingUpgrader`] if a step in the chain has no
/// upgrader, or whatever error an upgrader itself returns.
///
/// # Examples
///
/// ```
/// use resource_schema_core::*;
/// use serde_json::json;
///
/// fn add_flag(
///     mut state: RawState,
///     _: &dyn ProviderMeta,
/// ) -> std::result::Result<RawState, UpgradeError> {
///     state.entry("flag").or_insert(json!(false));
///     Ok(state)
/// }
///
/// struct Anon;
/// impl Client for Anon {
///     fn namespace(&self) -> &str { "" }
/// }
/// struct Meta(Anon);
/// impl ProviderMeta for Meta {
///     fn client(&self) -> &dyn Client { &self.0 }
/// }
///
/// let mut resource = ResourceSchema::default();
/// resource.schema_version = 1;
/// resource.state_upgraders.push(StateUpgrader::new(0, FieldMap::new(), add_flag));
///
/// let upgraded = upgrade_state(&resource, RawState::new(), 0, &Meta(Anon)).unwrap();
/// assert_eq!(upgraded.get("flag"), Some(&json!(false)));
/// ```
pub fn upgrade_state(
    resource: &ResourceSchema,
    mut state: RawState,
    stored_version: u32,
    meta: &dyn ProviderMeta,
) -> Result<RawState, UpgradeError> {
    let current = resource.schema_version;
    if stored_version > current {
        return Err(UpgradeError::VersionAhead {
            stored: stored_version,
            current,
        });
    }

    for version in stored_version..current {
        let upgrader = resource
            .state_upgraders
            .iter()
            .find(|u| u.version == version)
            .ok_or(UpgradeError::MissingUpgrader { from: version })?;
        trace!(from = version, keys = state.len(), "Applying state upgrader");
        state = upgrader.apply(state, meta)?;
    }

    if stored_version < current {
        debug!(from = stored_version, to = current, "Upgraded persisted state");
    }
    Ok(state)
}
