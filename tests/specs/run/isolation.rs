//! Behavioral specs for project and case isolation.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn setup_failure_blocks_the_project_but_not_siblings() {
    let temp = scenario_project();
    temp.config(
        r#"version = 1

[[project]]
name = "web"
root = "apps/web"
environment = "dom"
include = ["**/*.test.sh"]
setup = ["setup.sh"]

[[project]]
name = "api"
root = "apps/api"
include = ["**/*.test.sh"]
"#,
    );
    temp.file("apps/web/setup.sh", "exit 1\n");

    let assert = polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .code(1);
    let stdout = stdout_of(assert);

    assert!(stdout.contains("web [dom]: blocked"), "stdout: {stdout}");
    assert!(stdout.contains("2 file(s) not run due to setup failure"));
    // The sibling project still ran to completion.
    assert!(stdout.contains("api [process]: 1 passed"));
}

#[test]
fn failing_case_does_not_hide_sibling_results() {
    let temp = Project::empty();
    temp.config(
        r#"version = 1

[[project]]
name = "app"
root = "app"
include = ["*.test.sh"]
"#,
    );
    temp.test_file(
        "app/a.test.sh",
        &["not ok 1 - broken", "ok 2 - sibling case"],
    );
    temp.test_file("app/b.test.sh", &["ok 1 - sibling file"]);

    let assert = polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .code(1);
    let stdout = stdout_of(assert);

    assert!(stdout.contains("2 passed, 1 failed"), "stdout: {stdout}");
}

#[test]
fn zero_match_project_passes() {
    let temp = Project::empty();
    temp.config(
        r#"version = 1

[[project]]
name = "empty"
root = "empty"
include = ["**/*.test.sh"]
"#,
    );
    temp.file("empty/readme.md", "");

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("no test files matched"));
}

#[test]
fn environment_tag_reaches_the_test_process() {
    let temp = Project::empty();
    temp.config(
        r#"version = 1

[[project]]
name = "web"
root = "web"
environment = "dom"
include = ["*.test.sh"]
"#,
    );
    temp.file(
        "web/env.test.sh",
        "if test \"$POLYTEST_ENV\" = dom && test \"$POLYTEST_DOM\" = 1; then\n  echo \"ok 1 - dom globals\"\nelse\n  echo \"not ok 1 - dom globals\"\nfi\n",
    );

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success();
}

#[test]
fn failure_detail_is_reported() {
    let temp = Project::empty();
    temp.config(
        r#"version = 1

[[project]]
name = "app"
root = "app"
include = ["*.test.sh"]
"#,
    );
    temp.test_file(
        "app/a.test.sh",
        &["not ok 1 - handles click", "# expected handler to fire once"],
    );

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout(
            predicates::str::contains("not ok: handles click")
                .and(predicates::str::contains("expected handler to fire once")),
        );
}

#[test]
fn reruns_are_deterministic() {
    let temp = scenario_project();

    let shape = |stdout: &str| -> (bool, Vec<String>) {
        let value: serde_json::Value = serde_json::from_str(stdout).unwrap();
        let names = value["projects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        (value["verdict"] == "pass", names)
    };

    let first = stdout_of(
        polytest_cmd()
            .args(["run", "--output", "json"])
            .current_dir(temp.path())
            .assert()
            .success(),
    );
    let second = stdout_of(
        polytest_cmd()
            .args(["run", "--output", "json"])
            .current_dir(temp.path())
            .assert()
            .success(),
    );

    assert_eq!(shape(&first), shape(&second));
}
