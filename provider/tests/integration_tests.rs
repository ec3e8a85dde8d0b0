use std::collections::BTreeMap;

use resource_schema_core::{
    CustomizeDiff, DiffError, FieldMap, FieldSchema, PlannedDiff, ProviderSchema, RawState,
    ResourceDiff, ResourceMap, ResourceSchema, SchemaError, ValueType, merge_resources,
    upgrade_state, validate_resource,
};
use resource_schema_provider::{
    ConfigError, FIELD_DISABLE_REMOUNT, FIELD_NAMESPACE, NamespaceClient, ProviderConfig,
    ProviderContext, add_mount_migration_support, merge_namespace_field,
    namespace_path_customize_diff, namespace_schema,
};
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Diff whose change flags are set directly, the way the persistence engine
/// reports them.
#[derive(Default)]
struct FakeDiff {
    changes: BTreeMap<String, (Value, Value)>,
    forced: Vec<String>,
}

impl FakeDiff {
    fn changed(field: &str, old: &str, new: &str) -> Self {
        let mut diff = Self::default();
        diff.changes
            .insert(field.to_string(), (json!(old), json!(new)));
        diff
    }
}

impl ResourceDiff for FakeDiff {
    fn has_change(&self, field: &str) -> bool {
        self.changes.contains_key(field)
    }

    fn get_change(&self, field: &str) -> (Value, Value) {
        self.changes
            .get(field)
            .cloned()
            .unwrap_or((Value::Null, Value::Null))
    }

    fn force_new(&mut self, field: &str) -> Result<(), DiffError> {
        self.forced.push(field.to_string());
        Ok(())
    }
}

fn context(parent: &str) -> ProviderContext {
    ProviderContext::new(NamespaceClient::new(parent))
}

fn mount_resource() -> ResourceSchema {
    let mut fields = FieldMap::new();
    fields.insert(
        "path".into(),
        FieldSchema::required(ValueType::String).force_new(),
    );
    merge_namespace_field(&mut fields);
    ResourceSchema::new(fields).with_customize_diff(namespace_path_customize_diff())
}

fn state(pairs: &[(&str, Value)]) -> RawState {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Namespace recreate policy
// ---------------------------------------------------------------------------

#[test]
fn test_policy_without_namespace_change_is_noop() {
    let mut diff = FakeDiff::changed("path", "a", "b");
    namespace_path_customize_diff()
        .customize(&mut diff, &context("root"))
        .unwrap();
    assert!(diff.forced.is_empty());
}

#[test]
fn test_policy_first_time_set_is_noop() {
    let mut diff = FakeDiff::changed(FIELD_NAMESPACE, "", "team-a");
    namespace_path_customize_diff()
        .customize(&mut diff, &context("root"))
        .unwrap();
    assert!(diff.forced.is_empty());
}

#[test]
fn test_policy_qualified_state_matches_expected_path() {
    let mut diff = FakeDiff::changed(FIELD_NAMESPACE, "root/team-a", "team-a");
    namespace_path_customize_diff()
        .customize(&mut diff, &context("root"))
        .unwrap();
    assert!(diff.forced.is_empty());
}

#[test]
fn test_policy_fragment_state_forces_new() {
    let mut diff = FakeDiff::changed(FIELD_NAMESPACE, "team-a", "team-a");
    let result = namespace_path_customize_diff().customize(&mut diff, &context("root"));
    assert!(result.is_ok());
    assert_eq!(diff.forced, vec![FIELD_NAMESPACE.to_string()]);
}

#[test]
fn test_policy_runs_through_resource_hooks() {
    let resource = mount_resource();
    let mut diff = PlannedDiff::new(
        state(&[(FIELD_NAMESPACE, json!("team-a")), ("path", json!("kv"))]),
        state(&[(FIELD_NAMESPACE, json!("team-b")), ("path", json!("kv"))]),
    );
    resource
        .run_customize_diff(&mut diff, &context("root"))
        .unwrap();
    assert!(diff.requires_replace());
    assert_eq!(diff.changed_fields(), vec![FIELD_NAMESPACE]);
}

#[test]
fn test_policy_is_shareable_across_threads() {
    let ctx = context("root");
    let resource = mount_resource();

    let forced: Vec<bool> = std::thread::scope(|s| {
        let handles: Vec<_> = ["root/team-a", "team-a"]
            .into_iter()
            .map(|old| {
                let (ctx, resource) = (&ctx, &resource);
                s.spawn(move || {
                    let mut diff = PlannedDiff::new(
                        state(&[(FIELD_NAMESPACE, json!(old))]),
                        state(&[(FIELD_NAMESPACE, json!("team-a"))]),
                    );
                    resource.run_customize_diff(&mut diff, ctx).unwrap();
                    diff.requires_replace()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // "team-a" -> "team-a" has no change in a planned diff, so only the
    // qualified path is evaluated and it matches.
    assert_eq!(forced, vec![false, false]);
}

// ---------------------------------------------------------------------------
// Provider assembly
// ---------------------------------------------------------------------------

#[test]
fn test_provider_assembly_with_mount_migration() {
    let mut secrets = ResourceMap::new();
    secrets.insert("mount".into(), mount_resource());
    secrets.insert("kv_secret_backend".into(), mount_resource());

    let mut auth = ResourceMap::new();
    auth.insert("auth_backend".into(), mount_resource());

    let with_migration = |r: ResourceSchema| add_mount_migration_support(r, false);
    let schema = ProviderSchema::builder()
        .provider_fields(namespace_schema())
        .and_then(|b| b.resources(secrets, Some(&with_migration)))
        .and_then(|b| b.resources(auth, None))
        .unwrap()
        .build();

    assert_eq!(schema.resources().len(), 3);
    let mount = schema.resource("mount").unwrap();
    assert_eq!(mount.schema_version, 1);
    assert!(mount.has_field(FIELD_DISABLE_REMOUNT));
    assert!(validate_resource(mount).is_empty());

    let auth = schema.resource("auth_backend").unwrap();
    assert_eq!(auth.schema_version, 0);
    assert!(!auth.has_field(FIELD_DISABLE_REMOUNT));
}

#[test]
fn test_provider_assembly_rejects_duplicate_resource() {
    let mut first = ResourceMap::new();
    first.insert("mount".into(), mount_resource());
    let mut second = ResourceMap::new();
    second.insert("mount".into(), mount_resource());

    let err = ProviderSchema::builder()
        .resources(first, None)
        .and_then(|b| b.resources(second, None))
        .unwrap_err();
    assert_eq!(err, SchemaError::DuplicateResource("mount".into()));
}

#[test]
#[should_panic(expected = "cannot add resource, resource map already contains \"mount\"")]
fn test_merge_resources_aborts_on_duplicate() {
    let mut dest = ResourceMap::new();
    dest.insert("mount".into(), mount_resource());
    let mut contributions = ResourceMap::new();
    contributions.insert("mount".into(), mount_resource());
    merge_resources(&mut dest, contributions, None);
}

#[test]
#[should_panic(expected = "cannot add schema field \"namespace\"")]
fn test_namespace_field_cannot_be_added_twice() {
    let mut resource = mount_resource();
    merge_namespace_field(&mut resource.fields);
}

// ---------------------------------------------------------------------------
// State upgrades
// ---------------------------------------------------------------------------

#[test]
fn test_legacy_state_gains_disable_remount() {
    let resource = add_mount_migration_support(mount_resource(), false);
    let legacy = state(&[("path", json!("kv")), (FIELD_NAMESPACE, json!("team-a"))]);

    let upgraded = upgrade_state(&resource, legacy, 0, &context("")).unwrap();
    assert_eq!(upgraded[FIELD_DISABLE_REMOUNT], json!(false));
    assert_eq!(upgraded["path"], json!("kv"));
    assert_eq!(upgraded.len(), 3);
}

#[test]
fn test_explicit_disable_remount_survives_upgrade() {
    let resource = add_mount_migration_support(mount_resource(), false);
    let legacy = state(&[(FIELD_DISABLE_REMOUNT, json!(true))]);

    let upgraded = upgrade_state(&resource, legacy.clone(), 0, &context("")).unwrap();
    assert_eq!(upgraded, legacy);
}

#[test]
fn test_custom_upgrade_path_is_left_to_the_resource() {
    let resource = add_mount_migration_support(mount_resource(), true);
    assert_eq!(resource.schema_version, 0);
    assert!(resource.state_upgraders.is_empty());

    let current = state(&[("path", json!("kv"))]);
    let upgraded = upgrade_state(&resource, current.clone(), 0, &context("")).unwrap();
    assert_eq!(upgraded, current);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_round_trip_feeds_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("provider.yml");

    let config = ProviderConfig {
        version: "1.0".into(),
        namespace: Some("root".into()),
    };
    config.save(&path).unwrap();

    let loaded = ProviderConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    loaded.validate().unwrap();

    let ctx = ProviderContext::from_config(&loaded);
    let mut diff = FakeDiff::changed(FIELD_NAMESPACE, "root/team-a", "team-a");
    namespace_path_customize_diff()
        .customize(&mut diff, &ctx)
        .unwrap();
    assert!(diff.forced.is_empty());
}

#[test]
fn test_config_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ProviderConfig::load(dir.path().join("absent.yml"));
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[test]
fn test_config_rejects_leading_slash_namespace() {
    let config = ProviderConfig::from_yaml_str("version: \"1.0\"\nnamespace: /root\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("leading '/'"));
}
