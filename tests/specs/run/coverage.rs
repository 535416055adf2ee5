//! Behavioral specs for coverage collection.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

fn coverage_project() -> Project {
    let temp = Project::empty();
    temp.config(
        r#"version = 1

[[project]]
name = "app"
root = "app"
include = ["*.test.sh"]

[project.coverage]
provider = "profile"
reporters = ["text", "json"]
exclude = ["fixtures/**"]
"#,
    );
    temp.file(
        "app/a.test.sh",
        r#"echo "ok 1 - covered"
if test -n "$POLYTEST_COVERAGE_FILE"; then
  cat > "$POLYTEST_COVERAGE_FILE" <<'EOF'
{"files": {"src/app.sh": {"covered": 8, "total": 10}, "fixtures/gen.sh": {"covered": 5, "total": 5}}}
EOF
fi
"#,
    );
    temp
}

#[test]
fn coverage_flag_reports_and_writes_artifact() {
    let temp = coverage_project();

    polytest_cmd()
        .args(["run", "--coverage"])
        .current_dir(temp.path())
        .assert()
        .success()
        // Excluded fixtures do not count: 8/10 lines.
        .stdout(predicates::str::contains("coverage: lines 80.0%"));

    let artifact = temp.path().join(".polytest/coverage/app.json");
    assert!(artifact.is_file(), "missing {}", artifact.display());
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(artifact).unwrap()).unwrap();
    assert_eq!(value["lines"]["covered"], 8);
    assert!(value["files"].get("fixtures/gen.sh").is_none());
}

#[test]
fn coverage_is_off_by_default() {
    let temp = coverage_project();

    polytest_cmd()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("coverage:").not());

    assert!(!temp.path().join(".polytest/coverage/app.json").exists());
}
