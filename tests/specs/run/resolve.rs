//! Behavioral specs for project resolution and filtering.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn no_filter_runs_every_project_in_declaration_order() {
    let temp = scenario_project();

    let assert = polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success();
    let stdout = stdout_of(assert);

    assert!(stdout.contains("3 file(s)"), "stdout: {stdout}");
    let web = stdout.find("web [dom]").unwrap();
    let api = stdout.find("api [process]").unwrap();
    assert!(web < api);
}

#[test]
fn project_flag_ignores_other_projects_entirely() {
    let temp = scenario_project();

    let assert = polytest_cmd()
        .args(["run", "--project", "api"])
        .current_dir(temp.path())
        .assert()
        .success();
    let stdout = stdout_of(assert);

    assert!(stdout.contains("api [process]"));
    assert!(!stdout.contains("web [dom]"), "stdout: {stdout}");
    assert!(stdout.contains("1 file(s)"));
}

#[test]
fn declaration_order_wins_over_flag_order() {
    let temp = scenario_project();

    let assert = polytest_cmd()
        .args(["run", "--project", "api", "--project", "web"])
        .current_dir(temp.path())
        .assert()
        .success();
    let stdout = stdout_of(assert);

    let web = stdout.find("web [dom]").unwrap();
    let api = stdout.find("api [process]").unwrap();
    assert!(web < api, "stdout: {stdout}");
}

#[test]
fn filter_glob_limits_test_files() {
    let temp = scenario_project();

    let assert = polytest_cmd()
        .args(["run", "--filter", "src/home*"])
        .current_dir(temp.path())
        .assert()
        .success();
    let stdout = stdout_of(assert);

    // Only web's home file matches; api matches nothing and still passes.
    assert!(stdout.contains("1 file(s)"), "stdout: {stdout}");
    assert!(stdout.contains("api [process]: no test files matched"));
}

#[test]
fn failing_case_makes_the_exit_code_nonzero() {
    let temp = scenario_project();
    temp.test_file(
        "apps/web/src/button.test.sh",
        &["ok 1 - renders", "not ok 2 - handles click"],
    );

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout(predicates::str::contains("FAIL"));
}

#[test]
fn json_output_reports_the_verdict() {
    let temp = scenario_project();

    let assert = polytest_cmd()
        .args(["run", "--output", "json"])
        .current_dir(temp.path())
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_str(&stdout_of(assert)).unwrap();

    assert_eq!(value["verdict"], "pass");
    assert_eq!(value["summary"]["files"], 3);
    assert_eq!(value["projects"][0]["name"], "web");
    assert_eq!(value["projects"][1]["name"], "api");
}

#[test]
fn grep_narrows_reported_cases() {
    let temp = scenario_project();
    temp.test_file(
        "apps/web/src/button.test.sh",
        &["ok 1 - renders button", "not ok 2 - fetches data"],
    );

    // The failing case does not match the grep, so it is skipped and the
    // run passes.
    polytest_cmd()
        .args(["run", "--grep", "renders|loads|routes"])
        .current_dir(temp.path())
        .assert()
        .success();
}
