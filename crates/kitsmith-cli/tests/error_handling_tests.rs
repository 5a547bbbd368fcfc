//! Tests for error messages, suggestions and exit codes.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kitsmith(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kitsmith").unwrap();
    cmd.current_dir(tmp.path())
        .env("KITSMITH_REGISTRY__ROOT", tmp.path().join("registry"))
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg-config"))
        .env("HOME", tmp.path())
        .env_remove("RUST_LOG");
    cmd
}

fn kit_source(tmp: &TempDir, name: &str, with_templates: bool) -> PathBuf {
    let root = tmp.path().join("sources").join(name);
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join("metadata.yaml"),
        format!("name: {name}\ndescription: test kit\nplaceholders: [port]\n"),
    )
    .unwrap();
    if with_templates {
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::write(root.join("templates/main.go"), "listen {{port}}").unwrap();
    }
    root
}

#[test]
fn test_unknown_kit_is_not_found() {
    let tmp = TempDir::new().unwrap();

    kitsmith(&tmp)
        .args(["kit", "info", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Kit 'ghost' not found"))
        .stderr(predicate::str::contains("kitsmith kit list"));

    kitsmith(&tmp)
        .args(["kit", "remove", "ghost", "--yes"])
        .assert()
        .code(3);

    kitsmith(&tmp)
        .args(["new", "app", "--kit", "ghost"])
        .assert()
        .code(3);
}

#[test]
fn test_missing_placeholders_are_listed() {
    let tmp = TempDir::new().unwrap();
    let source = kit_source(&tmp, "svc", true);
    kitsmith(&tmp).args(["kit", "add"]).arg(&source).assert().success();

    kitsmith(&tmp)
        .args(["new", "api", "--kit", "svc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("needs values for: port"))
        .stderr(predicate::str::contains("--set port=<value>"));

    assert!(!tmp.path().join("api").exists());
}

#[test]
fn test_kit_without_templates_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let source = kit_source(&tmp, "hollow", false);

    kitsmith(&tmp)
        .args(["kit", "add"])
        .arg(&source)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("templates/"));

    assert!(!tmp.path().join("registry/kits/hollow").exists());
}

#[test]
fn test_duplicate_add_is_conflict() {
    let tmp = TempDir::new().unwrap();
    let source = kit_source(&tmp, "svc", true);
    kitsmith(&tmp).args(["kit", "add"]).arg(&source).assert().success();

    kitsmith(&tmp)
        .args(["kit", "add"])
        .arg(&source)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_local_source_leaves_nothing_behind() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("sources/nowhere");

    kitsmith(&tmp)
        .args(["kit", "add"])
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to acquire kit"));

    assert!(!tmp.path().join("registry/kits/nowhere").exists());
}

#[test]
fn test_existing_target_is_refused() {
    let tmp = TempDir::new().unwrap();
    let source = kit_source(&tmp, "svc", true);
    kitsmith(&tmp).args(["kit", "add"]).arg(&source).assert().success();
    fs::create_dir_all(tmp.path().join("api")).unwrap();

    kitsmith(&tmp)
        .args(["new", "api", "--kit", "svc", "--set", "port=1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_error_invalid_project_name() {
    let tmp = TempDir::new().unwrap();
    let source = kit_source(&tmp, "svc", true);
    kitsmith(&tmp).args(["kit", "add"]).arg(&source).assert().success();

    kitsmith(&tmp)
        .args(["new", "..", "--kit", "svc", "--set", "port=1"])
        .assert()
        .code(2);
}

#[test]
fn test_malformed_set_is_usage_error() {
    let tmp = TempDir::new().unwrap();

    kitsmith(&tmp)
        .args(["new", "api", "--kit", "svc", "--set", "port"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_unknown_config_key_is_configuration_error() {
    let tmp = TempDir::new().unwrap();

    kitsmith(&tmp)
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_missing_config_file_is_configuration_error() {
    let tmp = TempDir::new().unwrap();

    kitsmith(&tmp)
        .arg("--config")
        .arg(tmp.path().join("absent.toml"))
        .args(["kit", "list"])
        .assert()
        .code(4);
}
