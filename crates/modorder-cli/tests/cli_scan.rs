use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn modorder_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("modorder").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env("MODORDER_MODS_DIR", home.path().join("Mods"));
    cmd
}

#[test]
fn test_scan_lists_mods() {
    let tmp = TempDir::new().unwrap();
    let mods = tmp.path().join("Mods");
    fs::create_dir_all(mods.join("Content").join("param")).unwrap();
    fs::create_dir_all(mods.join("Coop")).unwrap();
    fs::write(mods.join("Coop").join("nrsc.dll"), b"").unwrap();

    modorder_cmd(&tmp)
        .args(["scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packages (1):"))
        .stdout(predicate::str::contains("[ ] Content"))
        .stdout(predicate::str::contains("[ ] Coop/nrsc.dll"));
}

#[test]
fn test_scan_empty_directory() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("Mods")).unwrap();

    modorder_cmd(&tmp)
        .args(["scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No mods found"));
}

#[test]
fn test_external_add_check_and_enable() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("Mods")).unwrap();
    let dll = tmp.path().join("tool.dll");
    fs::write(&dll, b"").unwrap();

    modorder_cmd(&tmp)
        .args(["external", "add", "native"])
        .arg(&dll)
        .assert()
        .success()
        .stderr(predicate::str::contains("Registered"));

    modorder_cmd(&tmp)
        .args(["external", "add", "native"])
        .arg(&dll)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already"));

    modorder_cmd(&tmp)
        .args(["external", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("native tool.dll: ok"));

    modorder_cmd(&tmp)
        .args(["scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tool.dll (external)"));

    modorder_cmd(&tmp)
        .args(["enable", "native", "tool.dll (external)"])
        .assert()
        .success();

    modorder_cmd(&tmp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(external)"));

    fs::remove_file(&dll).unwrap();
    modorder_cmd(&tmp)
        .args(["external", "cleanup"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Missing"));
}
