//! Behavioral specs for the init command.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn init_writes_a_starter_config() {
    let temp = Project::empty();

    polytest_cmd()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();

    let content = std::fs::read_to_string(temp.path().join("polytest.toml")).unwrap();
    assert!(content.starts_with("version = 1"));
}

#[test]
fn init_refuses_to_overwrite() {
    let temp = Project::empty();
    temp.config(MINIMAL_CONFIG);

    polytest_cmd()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("already exists"));
}

#[test]
fn init_force_overwrites() {
    let temp = Project::empty();
    temp.config("version = 1\n# customized\n");

    polytest_cmd()
        .args(["init", "--force"])
        .current_dir(temp.path())
        .assert()
        .success();

    let content = std::fs::read_to_string(temp.path().join("polytest.toml")).unwrap();
    assert!(!content.contains("# customized"));
}

#[test]
fn initialized_config_validates() {
    let temp = Project::empty();

    polytest_cmd()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();

    polytest_cmd()
        .args(["run", "--config-only"])
        .current_dir(temp.path())
        .assert()
        .success();
}
