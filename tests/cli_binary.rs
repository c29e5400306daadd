use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::path::Path;
use std::process::{Command, Output};

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child("app/build.gradle")
        .write_str("applicationId \"com.example.old\"\n")
        .unwrap();
    tmp.child("app/src/main/kotlin/com/example/old/File.txt")
        .write_str("com.example.old")
        .unwrap();
    tmp.child("app/src/main/kotlin/com/example/old/lib.so")
        .write_binary(b"\x00\xffcom.example.old")
        .unwrap();
    tmp
}

// Isolated from the caller's environment and user config file.
fn pkg_migrate(home: &Path) -> Command {
    let me = assert_cmd::cargo::cargo_bin!("pkg_migrate");
    let mut cmd = Command::new(me);
    cmd.env_remove("PKG_MIGRATE_CONFIG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn migrate(tmp: &TempDir, extra: &[&str]) -> Output {
    pkg_migrate(tmp.path())
        .arg("--project-root")
        .arg(tmp.path())
        .args(["--old-package", "com.example.old", "--new-package", "com.example.new"])
        .args(extra)
        .output()
        .expect("spawn binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn migrates_then_reports_already_migrated() {
    let tmp = project();

    let first = migrate(&tmp, &[]);
    assert_eq!(first.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    assert!(stdout(&first).contains("2 files migrated successfully"));
    tmp.child("app/src/main/kotlin/com/example/new/File.txt")
        .assert("com.example.new");
    assert!(!tmp.child("app/src/main/kotlin/com/example/old").path().exists());

    let second = migrate(&tmp, &[]);
    assert_eq!(second.status.code(), Some(1));
    assert!(stdout(&second).contains("Package name already updated."));
}

#[test]
fn setup_errors_exit_with_two() {
    let tmp = TempDir::new().unwrap();
    let out = migrate(&tmp, &[]);
    assert_eq!(out.status.code(), Some(2));

    let tmp = project();
    let out = pkg_migrate(tmp.path())
        .arg("--project-root")
        .arg(tmp.path())
        .args(["--old-package", "com.example.old", "--new-package", "com.example.old"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(tmp.child("app/src/main/kotlin/com/example/old/File.txt").path().exists());
}

#[test]
fn print_config_shows_effective_values() {
    let tmp = TempDir::new().unwrap();
    let out = pkg_migrate(tmp.path())
        .args(["--print-config", "--new-package", "org.other", "--code-roots", "a,b"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("new_package = org.other"));
    assert!(text.contains("code_roots = a, b"));
    assert!(text.contains("old_package = com.simplexray.an"));
}

#[test]
fn init_config_writes_once_and_is_picked_up_from_project_root() {
    let tmp = TempDir::new().unwrap();
    // Template creation refuses symlinked ancestors (e.g. /var on macOS).
    let root = std::fs::canonicalize(tmp.path()).unwrap();
    let cfg = root.join("pkg-migrate.xml");

    let out = pkg_migrate(tmp.path())
        .args(["--old-package", "com.a.b", "--init-config"])
        .arg(&cfg)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(cfg.is_file());

    let again = pkg_migrate(tmp.path())
        .arg("--init-config")
        .arg(&cfg)
        .output()
        .unwrap();
    assert_eq!(again.status.code(), Some(2));

    let shown = pkg_migrate(tmp.path())
        .arg("--project-root")
        .arg(&root)
        .arg("--print-config")
        .output()
        .unwrap();
    assert!(stdout(&shown).contains("old_package = com.a.b"));
}

#[test]
fn malformed_config_file_is_a_setup_error() {
    let tmp = project();
    let cfg = tmp.child("bad.xml");
    cfg.write_str("<config><unknown_knob>1</unknown_knob></config>").unwrap();
    let out = migrate(&tmp, &["--config", cfg.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid configuration"));
    assert!(tmp.child("app/src/main/kotlin/com/example/old").path().exists());
}

#[test]
fn json_logs_are_structured() {
    let tmp = project();
    let out = migrate(&tmp, &["--json"]);
    assert!(out.status.success());

    let events: Vec<serde_json::Value> = stdout(&out)
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("valid json log line"))
        .collect();
    let start = events
        .iter()
        .find(|e| e["fields"]["message"] == "Starting package migration")
        .expect("start event");
    assert_eq!(start["fields"]["old"], "com.example.old");
    assert_eq!(start["fields"]["new"], "com.example.new");
    assert!(events.iter().any(|e| e["level"] == "INFO"
        && e["fields"]["message"] == "Refactoring completed"
        && e["fields"]["rewritten"] == 1));
}

#[test]
fn strict_flag_exits_three_on_mismatch() {
    let tmp = project();
    tmp.child("app/src/main/kotlin/com/example/new/Extra.kt")
        .write_str("package com.example.new")
        .unwrap();
    let out = migrate(&tmp, &["--strict"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(tmp.child("app/src/main/kotlin/com/example/old/File.txt").path().exists());
}

#[test]
fn file_log_receives_events() {
    let tmp = project();
    let log = std::fs::canonicalize(tmp.path()).unwrap().join("logs/migrate.log");
    let out = migrate(&tmp, &["--log-file", log.to_str().unwrap()]);
    assert!(out.status.success());
    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Deleted old package directory"));
}
