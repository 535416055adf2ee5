// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.
//!
//! Loads and validates the configuration, resolves the invocation filter,
//! dispatches the selected projects, renders the report, and caches it for
//! `polytest report`. With `--watch`, keeps re-running affected projects on
//! file changes until interrupted.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use regex::Regex;
use termcolor::{ColorChoice, StandardStream};

use crate::cli::{OutputFormat, RunArgs};
use crate::config::{CONFIG_FILE, Config, CoverageReporter};
use crate::dispatch::{DispatchOptions, Dispatcher, InvocationFilter, resolve_projects};
use crate::latest::{LatestReport, coverage_dir, latest_path};
use crate::report::{self, ReportFormatter, TextFormatter};
use crate::results::RunReport;
use crate::watch::{WatchSession, WatchUpdate};
use crate::{coverage, discovery, git, walker};

pub fn run(cli_config: Option<PathBuf>, args: RunArgs) -> anyhow::Result<i32> {
    let config_path = match cli_config {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()?;
            discovery::find_config(&cwd).ok_or_else(|| {
                anyhow::anyhow!("no {CONFIG_FILE} found; run `polytest init` to create one")
            })?
        }
    };

    let config =
        Config::load(&config_path).with_context(|| "invalid configuration".to_string())?;

    if args.config_only {
        println!("configuration ok: {} project(s)", config.projects.len());
        return Ok(0);
    }

    let path_glob = args
        .filter
        .as_deref()
        .map(walker::compile_filter)
        .transpose()
        .with_context(|| "invalid --filter glob".to_string())?;
    let grep = args
        .grep
        .as_deref()
        .map(Regex::new)
        .transpose()
        .with_context(|| "invalid --grep regex".to_string())?;

    let filter = InvocationFilter {
        projects: args.projects.clone(),
        path_glob,
    };
    let options = DispatchOptions {
        coverage: args.coverage,
        grep,
    };

    // Fail on unknown --project names before running (or watching) anything.
    resolve_projects(&config, &filter).context("invalid invocation")?;

    if args.watch {
        run_watch(config, &config_path, filter, options, &args)
    } else {
        run_once(&config, &filter, &options, &args)
    }
}

/// One full dispatch: run, cache, render. Returns the process exit code.
fn run_once(
    config: &Config,
    filter: &InvocationFilter,
    options: &DispatchOptions,
    args: &RunArgs,
) -> anyhow::Result<i32> {
    let dispatcher = Dispatcher::new(config, options.clone());
    let report = dispatcher
        .run_invocation(filter)
        .context("invalid invocation")?;

    let latest = LatestReport {
        updated: Utc::now(),
        commit: git::head_commit(&config.base_dir),
        report,
    };

    if let Err(err) = latest.save(&latest_path(&config.base_dir)) {
        tracing::warn!("could not cache run report: {err}");
    }
    write_coverage_artifacts(config, &latest.report);

    match args.output {
        OutputFormat::Text => {
            let choice = args.color_mode().stdout_choice();
            if choice == ColorChoice::Never {
                print!("{}", TextFormatter.format(&latest)?);
            } else {
                let mut stream = StandardStream::stdout(choice);
                report::print_colored(&latest, &mut stream)?;
            }
        }
        other => print!("{}", report::format_report(other, Some(&latest))?),
    }

    Ok(if latest.report.passed() { 0 } else { 1 })
}

/// Long-lived mode: re-run affected projects on file changes.
fn run_watch(
    mut config: Config,
    config_path: &Path,
    base_filter: InvocationFilter,
    options: DispatchOptions,
    args: &RunArgs,
) -> anyhow::Result<i32> {
    let mut last_code = run_once(&config, &base_filter, &options, args)?;

    loop {
        let roots: Vec<(String, PathBuf)> = resolve_projects(&config, &base_filter)
            .context("invalid invocation")?
            .iter()
            .map(|p| (p.name.clone(), config.resolved_root(p)))
            .collect();
        let session = WatchSession::new(config_path, roots)
            .map_err(|err| anyhow::anyhow!("failed to start watcher: {err}"))?;
        eprintln!("watching for changes (interrupt to quit)");

        let mut reload = false;
        while let Some(update) = session.next_update() {
            match update {
                WatchUpdate::ConfigChanged => {
                    match Config::load(config_path) {
                        Ok(reloaded) => {
                            config = reloaded;
                            last_code = run_once(&config, &base_filter, &options, args)?;
                        }
                        // Keep the previous configuration; the user is likely
                        // mid-edit.
                        Err(err) => eprintln!("configuration error: {err}"),
                    }
                    // Roots may have changed; rebuild the watcher.
                    reload = true;
                    break;
                }
                WatchUpdate::Projects(names) => {
                    let names: Vec<String> = names
                        .into_iter()
                        .filter(|name| config.projects.iter().any(|p| &p.name == name))
                        .collect();
                    if names.is_empty() {
                        continue;
                    }
                    let subset = InvocationFilter {
                        projects: names,
                        path_glob: base_filter.path_glob.clone(),
                    };
                    last_code = run_once(&config, &subset, &options, args)?;
                }
            }
        }

        if !reload {
            // Watcher backend shut down; fall back to the last verdict.
            return Ok(last_code);
        }
    }
}

/// Write `.polytest/coverage/<project>.json` for projects that asked for it.
fn write_coverage_artifacts(config: &Config, report: &RunReport) {
    for result in &report.projects {
        let Some(summary) = &result.coverage else {
            continue;
        };
        let wants_json = config
            .projects
            .iter()
            .find(|p| p.name == result.name)
            .and_then(|p| p.coverage.as_ref())
            .is_some_and(|c| c.reporters.contains(&CoverageReporter::Json));
        if !wants_json {
            continue;
        }
        match coverage::write_artifact(&coverage_dir(&config.base_dir), &result.name, summary) {
            Ok(path) => tracing::debug!("wrote coverage artifact {}", path.display()),
            Err(err) => tracing::warn!("could not write coverage for {}: {err}", result.name),
        }
    }
}
