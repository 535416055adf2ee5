// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project execution sessions.
//!
//! A session owns everything a project's child processes see beyond their
//! inherited environment: the capability variables implied by the project's
//! environment tag, and a scratch directory for setup state and coverage
//! output. The scratch directory is removed when the session drops, so
//! teardown happens even when setup or a test fails early.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{Environment, ProjectConfig};

/// Variable carrying the environment tag (`dom` or `process`).
pub const ENV_TAG: &str = "POLYTEST_ENV";
/// Set to `1` under the DOM environment.
pub const ENV_DOM: &str = "POLYTEST_DOM";
/// Name of the running project.
pub const ENV_PROJECT: &str = "POLYTEST_PROJECT";
/// Absolute project root.
pub const ENV_ROOT: &str = "POLYTEST_ROOT";
/// Scratch directory, private to the project and removed at session end.
pub const ENV_SCRATCH: &str = "POLYTEST_SCRATCH";
/// Coverage provider identifier, present only when coverage is collected.
pub const ENV_COVERAGE_PROVIDER: &str = "POLYTEST_COVERAGE_PROVIDER";
/// Per-test-file coverage output path, present only when coverage is
/// collected.
pub const ENV_COVERAGE_FILE: &str = "POLYTEST_COVERAGE_FILE";

/// Scoped execution state for one project run.
pub struct ProjectSession {
    env: Vec<(String, String)>,
    scratch: TempDir,
    coverage_dir: Option<PathBuf>,
}

impl ProjectSession {
    /// Create a session for `project` rooted at `root`.
    ///
    /// When `coverage_provider` is set, a coverage subdirectory is created
    /// in the scratch space and the provider identifier is exported.
    pub fn new(
        project: &ProjectConfig,
        root: &Path,
        coverage_provider: Option<&str>,
    ) -> std::io::Result<Self> {
        let scratch = TempDir::with_prefix(format!("polytest-{}-", project.name))?;

        let mut env = vec![
            (ENV_PROJECT.to_string(), project.name.clone()),
            (ENV_TAG.to_string(), project.environment.as_str().to_string()),
            (ENV_ROOT.to_string(), root.display().to_string()),
            (
                ENV_SCRATCH.to_string(),
                scratch.path().display().to_string(),
            ),
        ];
        if project.environment == Environment::Dom {
            env.push((ENV_DOM.to_string(), "1".to_string()));
        }

        let coverage_dir = match coverage_provider {
            Some(provider) => {
                let dir = scratch.path().join("coverage");
                std::fs::create_dir_all(&dir)?;
                env.push((ENV_COVERAGE_PROVIDER.to_string(), provider.to_string()));
                Some(dir)
            }
            None => None,
        };

        Ok(Self {
            env,
            scratch,
            coverage_dir,
        })
    }

    /// Environment variables applied to every child process of this project.
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Scratch directory path.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Directory the coverage provider writes into, if coverage is enabled.
    pub fn coverage_dir(&self) -> Option<&Path> {
        self.coverage_dir.as_deref()
    }

    /// Coverage output path for the test file at `index`, if coverage is
    /// enabled.
    pub fn coverage_file(&self, index: usize) -> Option<PathBuf> {
        self.coverage_dir
            .as_ref()
            .map(|dir| dir.join(format!("{index}.json")))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
