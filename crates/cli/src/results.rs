// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Result records produced by a run.
//!
//! A leaf record per test case, one record per test file, an aggregate per
//! project, and the whole-invocation report. All of it serializes to JSON
//! for `--output json` and the latest-report cache.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::coverage::CoverageSummary;

/// Serialize durations as fractional seconds.
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        if secs.is_finite() && secs > 0.0 {
            Ok(Duration::from_secs_f64(secs))
        } else {
            Ok(Duration::ZERO)
        }
    }
}

/// Outcome of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
    Skipped,
}

/// One test case as reported by the test file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub status: CaseStatus,

    /// Duration reported by the harness via a `time=` directive, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Failure diagnostics (or skip reason) attached to this case.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<String>,
}

/// Outcome of one test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Passed,
    Failed,
    /// Not run because the project's setup failed.
    Blocked,
}

/// One test file: its case records plus file-level failures (harness crash,
/// bad exit code, timeout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    /// Path relative to the project root.
    pub path: PathBuf,
    pub status: FileStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cases: Vec<CaseResult>,

    #[serde(with = "duration_secs")]
    pub duration: Duration,

    /// File-level failure, independent of individual case failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    /// Build a record from parsed cases; the status is failed when any case
    /// failed or a file-level error occurred.
    pub fn from_cases(
        path: PathBuf,
        cases: Vec<CaseResult>,
        duration: Duration,
        error: Option<String>,
    ) -> Self {
        let failed =
            error.is_some() || cases.iter().any(|c| c.status == CaseStatus::Failed);
        Self {
            path,
            status: if failed {
                FileStatus::Failed
            } else {
                FileStatus::Passed
            },
            cases,
            duration,
            error,
        }
    }

    /// A file that never ran because project setup failed.
    pub fn blocked(path: PathBuf, reason: &str) -> Self {
        Self {
            path,
            status: FileStatus::Blocked,
            cases: Vec::new(),
            duration: Duration::ZERO,
            error: Some(reason.to_string()),
        }
    }

    /// A file that failed before any case could be reported.
    pub fn failed(path: PathBuf, reason: String, duration: Duration) -> Self {
        Self {
            path,
            status: FileStatus::Failed,
            cases: Vec::new(),
            duration,
            error: Some(reason),
        }
    }
}

/// Project-level outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectOutcome {
    Passed,
    Failed,
    /// Setup failed; no test file ran.
    Blocked { reason: String },
    /// The project could not be set up at all (scratch dir, runner).
    Infra { reason: String },
}

/// Case counters rolled up across files or projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl CaseCounts {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    fn record(&mut self, status: CaseStatus) {
        match status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed => self.failed += 1,
            CaseStatus::Skipped => self.skipped += 1,
        }
    }

    fn merge(&mut self, other: CaseCounts) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Aggregate result for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResult {
    pub name: String,
    pub environment: Environment,
    pub outcome: ProjectOutcome,
    pub files: Vec<FileResult>,

    #[serde(with = "duration_secs")]
    pub duration: Duration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageSummary>,
}

impl ProjectResult {
    /// A project that failed before anything could execute.
    pub fn infra(
        name: &str,
        environment: Environment,
        reason: String,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.to_string(),
            environment,
            outcome: ProjectOutcome::Infra { reason },
            files: Vec::new(),
            duration,
            coverage: None,
        }
    }

    /// A project whose setup failed: every discovered file is blocked.
    pub fn blocked(
        name: &str,
        environment: Environment,
        reason: String,
        files: Vec<PathBuf>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.to_string(),
            environment,
            files: files
                .into_iter()
                .map(|path| FileResult::blocked(path, "not run due to setup failure"))
                .collect(),
            outcome: ProjectOutcome::Blocked { reason },
            duration,
            coverage: None,
        }
    }

    /// True only for a clean pass; blocked and infra outcomes are failing.
    pub fn passed(&self) -> bool {
        matches!(self.outcome, ProjectOutcome::Passed)
    }

    pub fn case_counts(&self) -> CaseCounts {
        let mut counts = CaseCounts::default();
        for file in &self.files {
            for case in &file.cases {
                counts.record(case.status);
            }
        }
        counts
    }
}

/// Everything one invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Project results in resolution (declaration) order.
    pub projects: Vec<ProjectResult>,

    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl RunReport {
    /// Overall verdict: failing iff any selected project did not pass.
    pub fn passed(&self) -> bool {
        self.projects.iter().all(ProjectResult::passed)
    }

    pub fn case_counts(&self) -> CaseCounts {
        let mut counts = CaseCounts::default();
        for project in &self.projects {
            counts.merge(project.case_counts());
        }
        counts
    }

    /// Total number of test files across all projects.
    pub fn file_count(&self) -> usize {
        self.projects.iter().map(|p| p.files.len()).sum()
    }

    pub fn failed_project_count(&self) -> usize {
        self.projects.iter().filter(|p| !p.passed()).count()
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
