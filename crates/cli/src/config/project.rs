// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project configuration structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Simulated runtime context a project's test processes execute under.
///
/// The tag selects which capability variables are exported into the project's
/// child processes; it is scoped to those processes and cannot leak into
/// sibling projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Browser-like DOM simulation.
    Dom,
    /// Plain process runtime.
    #[default]
    Process,
}

impl Environment {
    /// Tag value exported as `POLYTEST_ENV`.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dom => "dom",
            Environment::Process => "process",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named project: a group of test files sharing a root directory, a
/// runtime environment and a setup sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Unique identifier, used for filtering and reporting.
    pub name: String,

    /// Directory scoping test-file discovery, relative to the config file.
    pub root: PathBuf,

    /// Runtime environment tag.
    #[serde(default)]
    pub environment: Environment,

    /// A file is selected iff it matches at least one include pattern
    /// and no exclude pattern. Must not be empty.
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Files executed once, in declared order, before any test file in the
    /// project. Later setup files may rely on earlier ones having run.
    #[serde(default)]
    pub setup: Vec<PathBuf>,

    /// Argv prefix used to execute setup and test files. The test file path
    /// is substituted for a literal `{file}` element, or appended.
    #[serde(default)]
    pub runner: Option<Vec<String>>,

    /// Per-test-file wall-clock timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Wall-clock bound for the whole project, in seconds. Files that have
    /// not started when it expires are marked failed; sibling projects are
    /// unaffected.
    #[serde(default)]
    pub project_timeout: Option<u64>,

    /// Coverage collection settings; absent means the project never
    /// participates in coverage runs.
    #[serde(default)]
    pub coverage: Option<CoverageConfig>,
}

/// Coverage settings for one project.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverageConfig {
    /// Provider identifier, exported to the test process as
    /// `POLYTEST_COVERAGE_PROVIDER`.
    pub provider: String,

    /// Where the per-project summary ends up.
    #[serde(default = "CoverageConfig::default_reporters")]
    pub reporters: Vec<CoverageReporter>,

    /// Source files excluded from coverage accounting.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl CoverageConfig {
    pub(super) fn default_reporters() -> Vec<CoverageReporter> {
        vec![CoverageReporter::Text]
    }
}

/// Coverage output targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageReporter {
    /// Inline in the run summary.
    Text,
    /// Written to `.polytest/coverage/<project>.json`.
    Json,
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
