use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn modorder_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("modorder").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("MODORDER_MODS_DIR")
        .env_remove("RUST_LOG")
        .arg("--mods-dir")
        .arg(home.path().join("Mods"));
    cmd
}

#[test]
fn test_enable_package_writes_profile() {
    let tmp = TempDir::new().unwrap();

    modorder_cmd(&tmp)
        .args(["enable", "package", "ModA"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Enabled"));

    let profile = fs::read_to_string(tmp.path().join("Mods").join("current.me3")).unwrap();
    assert!(profile.contains("[[packages]]"));
    assert!(profile.contains("ModA"));
    assert!(profile.contains("nightreign"));

    modorder_cmd(&tmp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] ModA"));
}

#[test]
fn test_enable_twice_fails() {
    let tmp = TempDir::new().unwrap();

    modorder_cmd(&tmp)
        .args(["enable", "native", "tool.dll"])
        .assert()
        .success();

    modorder_cmd(&tmp)
        .args(["enable", "native", "tool.dll"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already enabled"));
}

#[test]
fn test_disable_unknown_fails() {
    let tmp = TempDir::new().unwrap();

    modorder_cmd(&tmp)
        .args(["disable", "package", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_unknown_kind_rejected() {
    let tmp = TempDir::new().unwrap();

    modorder_cmd(&tmp)
        .args(["enable", "plugin", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown entity kind"));
}

#[test]
fn test_disable_removes_from_profile() {
    let tmp = TempDir::new().unwrap();

    modorder_cmd(&tmp)
        .args(["enable", "package", "ModA"])
        .assert()
        .success();
    modorder_cmd(&tmp)
        .args(["enable", "package", "ModB"])
        .assert()
        .success();
    modorder_cmd(&tmp)
        .args(["force-last", "ModB"])
        .assert()
        .success();
    modorder_cmd(&tmp)
        .args(["disable", "package", "ModA"])
        .assert()
        .success();

    let profile = fs::read_to_string(tmp.path().join("Mods").join("current.me3")).unwrap();
    assert!(!profile.contains("ModA"));
    assert!(!profile.contains("load_after"));
}

#[test]
fn test_comment_shows_in_list() {
    let tmp = TempDir::new().unwrap();

    modorder_cmd(&tmp)
        .args(["enable", "package", "ModA"])
        .assert()
        .success();
    modorder_cmd(&tmp)
        .args(["comment", "package", "ModA", "load me early"])
        .assert()
        .success();

    modorder_cmd(&tmp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# load me early"));

    let registry =
        fs::read_to_string(tmp.path().join("Mods").join("external_mods.json")).unwrap();
    assert!(registry.contains("load me early"));
}

#[test]
fn test_toggle_off_drops_from_profile() {
    let tmp = TempDir::new().unwrap();

    modorder_cmd(&tmp)
        .args(["enable", "package", "ModA"])
        .assert()
        .success();
    modorder_cmd(&tmp)
        .args(["toggle", "package", "ModA"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Disabled"))
        .stderr(predicate::str::contains("use `enable`"));

    let profile = fs::read_to_string(tmp.path().join("Mods").join("current.me3")).unwrap();
    assert!(!profile.contains("ModA"));

    modorder_cmd(&tmp)
        .args(["enable", "package", "ModA"])
        .assert()
        .success();
}
