//! Configuration loading tests

use org_rbac::config::{LogFormat, load_config, load_config_from_str};
use org_rbac::rbac::{Identity, Organization, Permission, PolicyEngine, Role, RoleSource};
use std::env;
use std::fs;
use tempfile::tempdir;

const MINIMAL_CONFIG: &str = r#"
[logging]
level = "warn"
"#;

const FULL_CONFIG: &str = r#"
[policy]
global_role_fallback = false
owner_grants = ["event:publish", "budget:create"]

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.policy.global_role_fallback);
    assert!(config.policy.owner_grants.is_empty());
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    assert!(!config.policy.global_role_fallback);
    assert_eq!(
        config.policy.owner_grants,
        vec!["event:publish", "budget:create"]
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_full_config_drives_engine() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();
    let engine = PolicyEngine::new(&config.policy).unwrap();

    let user = Identity::new(5).with_global_role(Role::Member);
    let org = Organization::new(1, 5);
    let ctx = engine.user_context(&user, Some(&org), None, None);

    // Fallback disabled: the global role grants permissions but is not an org role
    assert_eq!(ctx.organization_role(), None);
    assert_eq!(ctx.organization_role_source(), RoleSource::Absent);
    assert!(ctx.has_permission(Permission::TaskCreate));

    // Owner grants: fixed escalation plus configured extras
    assert!(ctx.has_permission(Permission::EventCreate));
    assert!(ctx.has_permission(Permission::UserInvite));
    assert!(ctx.has_permission(Permission::EventPublish));
    assert!(ctx.has_permission(Permission::BudgetCreate));
}

#[test]
fn test_unknown_owner_grant_rejected() {
    let config_str = r#"
[policy]
owner_grants = ["event:approve"]
"#;

    let result = load_config_from_str(config_str);
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_rejected() {
    let result = load_config_from_str("[policy\nglobal_role_fallback = true");
    assert!(result.is_err());
}

#[test]
#[serial_test::serial]
fn test_load_from_explicit_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("org-rbac.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
    assert!(!config.policy.global_role_fallback);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
#[serial_test::serial]
fn test_env_var_overrides_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("org-rbac.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::set_var("ORG_RBAC__POLICY__GLOBAL_ROLE_FALLBACK", "true");
        env::set_var("ORG_RBAC__LOGGING__LEVEL", "error");
    }

    let result = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("ORG_RBAC__POLICY__GLOBAL_ROLE_FALLBACK");
        env::remove_var("ORG_RBAC__LOGGING__LEVEL");
    }

    let config = result.unwrap();
    assert!(config.policy.global_role_fallback);
    assert_eq!(config.logging.level, "error");
    // Untouched keys still come from the file
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
#[serial_test::serial]
fn test_env_var_owner_grants_list() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("org-rbac.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("ORG_RBAC__POLICY__OWNER_GRANTS", "event:publish,team:create");
    }

    let result = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("ORG_RBAC__POLICY__OWNER_GRANTS");
    }

    let config = result.unwrap();
    assert_eq!(
        config.policy.owner_grants,
        vec!["event:publish", "team:create"]
    );
}

#[test]
#[serial_test::serial]
fn test_env_var_invalid_grant_rejected() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("org-rbac.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("ORG_RBAC__POLICY__OWNER_GRANTS", "event:approve");
    }

    let result = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("ORG_RBAC__POLICY__OWNER_GRANTS");
    }

    assert!(result.is_err());
}
