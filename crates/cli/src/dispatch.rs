// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The workspace test dispatcher.
//!
//! One invocation resolves a subset of the declared projects, runs each
//! project independently (in parallel), and merges the results in
//! declaration order. Projects share no mutable state; a panic inside one
//! project's runner is caught and reported as an infrastructure error for
//! that project only.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::time::{Duration, Instant};

use globset::GlobSet;
use rayon::prelude::*;
use regex::Regex;

use crate::config::{Config, ConfigError, ProjectConfig};
use crate::coverage;
use crate::exec::{self, ExecRequest};
use crate::results::{
    CaseStatus, FileResult, FileStatus, ProjectOutcome, ProjectResult, RunReport,
};
use crate::session::{self, ProjectSession};
use crate::tap;
use crate::walker::TestFileWalker;

/// Which projects and files an invocation touches.
#[derive(Default)]
pub struct InvocationFilter {
    /// Project names from `--project`; empty means all projects.
    pub projects: Vec<String>,
    /// Compiled `--filter` glob narrowing test files by relative path.
    pub path_glob: Option<GlobSet>,
}

/// Invocation-wide execution options.
#[derive(Default, Clone)]
pub struct DispatchOptions {
    /// Collect coverage for projects that declare a coverage section.
    pub coverage: bool,
    /// Case-name filter; non-matching cases are reported skipped.
    pub grep: Option<Regex>,
}

/// Resolve the ordered subset of projects an invocation runs.
///
/// The result preserves declaration order regardless of filter order, so
/// report ordering is stable across runs. Naming an undeclared project is a
/// configuration error.
pub fn resolve_projects<'a>(
    config: &'a Config,
    filter: &InvocationFilter,
) -> Result<Vec<&'a ProjectConfig>, ConfigError> {
    if filter.projects.is_empty() {
        return Ok(config.projects.iter().collect());
    }

    for name in &filter.projects {
        if !config.projects.iter().any(|p| &p.name == name) {
            return Err(ConfigError::UnknownProject { name: name.clone() });
        }
    }

    Ok(config
        .projects
        .iter()
        .filter(|p| filter.projects.iter().any(|name| name == &p.name))
        .collect())
}

/// Runs resolved projects and aggregates their results.
pub struct Dispatcher<'a> {
    config: &'a Config,
    options: DispatchOptions,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a Config, options: DispatchOptions) -> Self {
        Self { config, options }
    }

    /// Resolve and run, merging results in resolution order.
    pub fn run_invocation(&self, filter: &InvocationFilter) -> Result<RunReport, ConfigError> {
        let started = Instant::now();
        let resolved = resolve_projects(self.config, filter)?;
        tracing::info!("running {} project(s)", resolved.len());

        let projects: Vec<ProjectResult> = resolved
            .par_iter()
            .map(|project| {
                // A panic in one project must not take down its siblings.
                catch_unwind(AssertUnwindSafe(|| {
                    self.run_project(project, filter.path_glob.as_ref())
                }))
                .unwrap_or_else(|_| {
                    ProjectResult::infra(
                        &project.name,
                        project.environment,
                        "internal error: project runner panicked".to_string(),
                        Duration::ZERO,
                    )
                })
            })
            .collect();

        Ok(RunReport {
            projects,
            duration: started.elapsed(),
        })
    }

    /// Run one project: session, setup files, discovered test files.
    pub fn run_project(
        &self,
        project: &ProjectConfig,
        path_filter: Option<&GlobSet>,
    ) -> ProjectResult {
        let started = Instant::now();
        let span = tracing::debug_span!("project", name = %project.name);
        let _guard = span.enter();

        let root = self.config.resolved_root(project);

        let walker = match TestFileWalker::new(project, path_filter) {
            Ok(walker) => walker,
            Err(err) => {
                return ProjectResult::infra(
                    &project.name,
                    project.environment,
                    err.to_string(),
                    started.elapsed(),
                );
            }
        };
        let files = walker.discover(&root);

        let coverage_provider = if self.options.coverage {
            project.coverage.as_ref().map(|c| c.provider.as_str())
        } else {
            None
        };
        let session = match ProjectSession::new(project, &root, coverage_provider) {
            Ok(session) => session,
            Err(err) => {
                return ProjectResult::infra(
                    &project.name,
                    project.environment,
                    format!("failed to create project session: {err}"),
                    started.elapsed(),
                );
            }
        };

        let runner = self.config.runner_for(project);
        let timeout = self.config.timeout_for(project);

        // Setup files run sequentially in declared order; the first failure
        // blocks the whole project.
        for setup in &project.setup {
            let request = ExecRequest {
                runner: &runner,
                file: setup,
                cwd: &root,
                env: session.env(),
                extra_env: &[],
                timeout,
            };
            let reason = match exec::run_file(&request) {
                Ok(outcome) if outcome.success() => continue,
                Ok(outcome) if outcome.timed_out => format!(
                    "setup file {} timed out after {}s",
                    setup.display(),
                    timeout.as_secs()
                ),
                Ok(outcome) => format!(
                    "setup file {} failed with exit code {}",
                    setup.display(),
                    exit_code_label(outcome.exit_code)
                ),
                Err(err) => {
                    format!("setup file {} could not be executed: {err}", setup.display())
                }
            };
            tracing::debug!("blocking project: {reason}");
            return ProjectResult::blocked(
                &project.name,
                project.environment,
                reason,
                files,
                started.elapsed(),
            );
        }

        let deadline = project
            .project_timeout
            .map(|secs| started + Duration::from_secs(secs));

        let file_results: Vec<FileResult> = files
            .par_iter()
            .enumerate()
            .map(|(index, file)| {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return FileResult::failed(
                        file.clone(),
                        "not started: project timeout exceeded".to_string(),
                        Duration::ZERO,
                    );
                }
                self.run_test_file(&session, &runner, timeout, &root, index, file)
            })
            .collect();

        let coverage = project.coverage.as_ref().and_then(|cov_config| {
            let dir = session.coverage_dir()?;
            match coverage::collect(dir, cov_config) {
                Ok(summary) => Some(summary),
                Err(err) => {
                    tracing::warn!("project {}: dropping coverage: {err}", project.name);
                    None
                }
            }
        });

        let outcome = if file_results.iter().all(|f| f.status == FileStatus::Passed) {
            ProjectOutcome::Passed
        } else {
            ProjectOutcome::Failed
        };

        ProjectResult {
            name: project.name.clone(),
            environment: project.environment,
            outcome,
            files: file_results,
            duration: started.elapsed(),
            coverage,
        }
    }

    fn run_test_file(
        &self,
        session: &ProjectSession,
        runner: &[String],
        timeout: Duration,
        root: &Path,
        index: usize,
        file: &Path,
    ) -> FileResult {
        let mut extra_env = Vec::new();
        if let Some(path) = session.coverage_file(index) {
            extra_env.push((
                session::ENV_COVERAGE_FILE.to_string(),
                path.display().to_string(),
            ));
        }

        let request = ExecRequest {
            runner,
            file,
            cwd: root,
            env: session.env(),
            extra_env: &extra_env,
            timeout,
        };
        let outcome = match exec::run_file(&request) {
            Ok(outcome) => outcome,
            Err(err) => {
                return FileResult::failed(
                    file.to_path_buf(),
                    format!("could not execute: {err}"),
                    Duration::ZERO,
                );
            }
        };

        if !outcome.stderr.trim().is_empty() {
            tracing::debug!("{}: stderr: {}", file.display(), outcome.stderr.trim());
        }

        let mut doc = tap::parse(&outcome.stdout);
        if let Some(grep) = &self.options.grep {
            for case in &mut doc.cases {
                if !grep.is_match(&case.name) {
                    case.status = CaseStatus::Skipped;
                    case.detail = vec!["filtered out by --grep".to_string()];
                }
            }
        }

        let error = if outcome.timed_out {
            Some(format!("timed out after {}s", timeout.as_secs()))
        } else if let Some(reason) = doc.bailed.take() {
            Some(if reason.is_empty() {
                "bailed out".to_string()
            } else {
                format!("bailed out: {reason}")
            })
        } else if let Some((planned, reported)) = doc.plan_mismatch() {
            Some(format!("planned {planned} test(s) but reported {reported}"))
        } else if outcome.exit_code != Some(0)
            && !doc.cases.iter().any(|c| c.status == CaseStatus::Failed)
        {
            Some(format!(
                "test file exited with code {}",
                exit_code_label(outcome.exit_code)
            ))
        } else {
            None
        };

        FileResult::from_cases(file.to_path_buf(), doc.cases, outcome.duration, error)
    }
}

fn exit_code_label(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (killed by signal)".to_string(),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
