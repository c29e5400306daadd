use assert_fs::TempDir;
use assert_fs::prelude::*;
use pkg_migrate::{Config, run};
use std::fs;

const DESCRIPTOR: &str = "android {\n    defaultConfig { applicationId \"com.example.old\" }\n    buildTypes {\n        release {\n            minifyEnabled false\n            shrinkResources false\n        }\n        debug {\n            minifyEnabled true\n        }\n    }\n}\n";

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child("app/build.gradle").write_str(DESCRIPTOR).unwrap();
    tmp.child("app/src/main/kotlin/com/example/old/App.kt")
        .write_str("package com.example.old\n")
        .unwrap();
    tmp
}

#[test]
fn hardening_patches_descriptor_and_writes_policy_files() {
    let tmp = project();
    let report = run(&Config::new("com.example.old", "com.example.new", tmp.path())).unwrap();

    let descriptor = fs::read_to_string(tmp.child("app/build.gradle").path()).unwrap();
    assert!(descriptor.contains("applicationId \"com.example.new\""));
    assert!(descriptor.contains("release {\n            minifyEnabled true\n            shrinkResources true"));
    assert!(descriptor.contains("debug {\n            minifyEnabled false"));
    assert!(report.descriptor_patched);

    let rules = fs::read_to_string(tmp.child("app/proguard-rules.pro").path()).unwrap();
    assert!(rules.contains("-keep class com.example.new.** { *; }"));
    let props = fs::read_to_string(tmp.child("gradle.properties").path()).unwrap();
    assert!(props.contains("org.gradle.parallel=true"));

    assert_eq!(report.policy_files.len(), 2);
    assert!(report.post_errors.is_empty());
}

#[test]
fn disabled_hardening_turns_release_minify_off_and_skips_rules() {
    let tmp = project();
    tmp.child("app/build.gradle")
        .write_str(&DESCRIPTOR.replace("minifyEnabled false", "minifyEnabled true"))
        .unwrap();
    let mut cfg = Config::new("com.example.old", "com.example.new", tmp.path());
    cfg.enable_hardening = false;

    let report = run(&cfg).unwrap();
    let descriptor = fs::read_to_string(tmp.child("app/build.gradle").path()).unwrap();
    assert!(descriptor.contains("release {\n            minifyEnabled false\n            shrinkResources false"));
    // Debug block is only touched when hardening.
    assert!(descriptor.contains("debug {\n            minifyEnabled true"));
    assert!(!tmp.child("app/proguard-rules.pro").path().exists());
    assert!(tmp.child("gradle.properties").path().is_file());
    assert_eq!(report.policy_files.len(), 1);
}
