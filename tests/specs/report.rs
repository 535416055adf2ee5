//! Behavioral specs for the report command.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn report_without_a_previous_run_says_so() {
    let temp = Project::empty();

    polytest_cmd()
        .arg("report")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("No previous run found"));
}

#[test]
fn report_rerenders_the_cached_run() {
    let temp = scenario_project();

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success();

    polytest_cmd()
        .arg("report")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(
            predicates::str::contains("Polytest Report")
                .and(predicates::str::contains("PASS")),
        );
}

#[test]
fn report_renders_json_from_the_cache() {
    let temp = scenario_project();

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success();

    let assert = polytest_cmd()
        .args(["report", "--output", "json"])
        .current_dir(temp.path())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(value["verdict"], "pass");
    assert_eq!(value["summary"]["projects"], 2);
}

#[test]
fn report_keeps_a_failing_verdict() {
    let temp = scenario_project();
    temp.test_file("apps/api/router.test.sh", &["not ok 1 - routes"]);

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .code(1);

    polytest_cmd()
        .arg("report")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("FAIL"));
}
