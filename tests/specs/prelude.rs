//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for building temp workspaces and invoking the
//! polytest binary against them.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)] // helpers are shared unevenly across spec modules

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::PredicateBooleanExt;

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Returns a Command configured to run the polytest binary.
pub fn polytest_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("polytest"));
    // Keep ambient configuration out of the specs.
    cmd.env_remove("POLYTEST_CONFIG");
    cmd
}

/// A temp workspace the binary runs against.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// An empty workspace. The `.git` marker stops config discovery from
    /// walking above the temp directory.
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write polytest.toml.
    pub fn config(&self, content: &str) {
        self.file("polytest.toml", content);
    }

    /// Write an arbitrary file, creating parent directories.
    pub fn file(&self, path: &str, content: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }

    /// Write a shell test file that reports the given protocol lines.
    pub fn test_file(&self, path: &str, lines: &[&str]) {
        let mut script = String::new();
        for line in lines {
            script.push_str(&format!("echo \"{line}\"\n"));
        }
        self.file(path, &script);
    }
}

/// The two-project scenario: "web" (DOM simulation, 2 test files) and "api"
/// (plain process, 1 test file), all passing.
pub fn scenario_project() -> Project {
    let temp = Project::empty();
    temp.config(SCENARIO_CONFIG);
    temp.test_file("apps/web/src/button.test.sh", &["ok 1 - renders"]);
    temp.test_file("apps/web/src/home.test.sh", &["ok 1 - loads"]);
    temp.test_file("apps/api/router.test.sh", &["ok 1 - routes"]);
    temp
}

pub const SCENARIO_CONFIG: &str = r#"version = 1

[[project]]
name = "web"
root = "apps/web"
environment = "dom"
include = ["**/*.test.sh"]

[[project]]
name = "api"
root = "apps/api"
include = ["**/*.test.sh"]
"#;

pub const MINIMAL_CONFIG: &str = "version = 1\n";
