//! Behavioral specs for configuration validation.
//!
//! Schema errors are fatal: they are reported before any project runs and
//! no report is produced.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn unknown_config_key_fails() {
    let temp = Project::empty();
    temp.config("version = 1\nmystery = true\n");

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown field"));
}

#[test]
fn duplicate_project_name_fails_with_the_name() {
    let temp = Project::empty();
    temp.file("a/.keep", "");
    temp.file("b/.keep", "");
    temp.config(
        r#"version = 1

[[project]]
name = "web"
root = "a"
include = ["*"]

[[project]]
name = "web"
root = "b"
include = ["*"]
"#,
    );

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("duplicate project name `web`"));
}

#[test]
fn missing_root_fails_with_the_name() {
    let temp = Project::empty();
    temp.config(
        r#"version = 1

[[project]]
name = "ghost"
root = "does/not/exist"
include = ["*"]
"#,
    );

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(
            predicates::str::contains("ghost")
                .and(predicates::str::contains("does not exist")),
        );
}

#[test]
fn empty_include_list_fails() {
    let temp = Project::empty();
    temp.file("a/.keep", "");
    temp.config(
        r#"version = 1

[[project]]
name = "a"
root = "a"
include = []
"#,
    );

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("include patterns must not be empty"));
}

#[test]
fn unknown_project_flag_fails_before_running() {
    let temp = scenario_project();

    polytest_cmd()
        .args(["run", "--project", "mobile"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("no project named `mobile`"));
}

#[test]
fn config_only_validates_without_running() {
    let temp = Project::empty();
    temp.config(MINIMAL_CONFIG);

    polytest_cmd()
        .args(["run", "--config-only"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("configuration ok"));
}

#[test]
fn valid_config_runs_cleanly() {
    let temp = scenario_project();

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicates::str::is_empty());
}
