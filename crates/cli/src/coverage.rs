// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coverage collection and aggregation.
//!
//! The dispatcher never instruments anything itself: the external provider
//! running inside the test process writes one JSON record per test file to
//! the path given in `POLYTEST_COVERAGE_FILE`. After the project's files have
//! run, the records are merged into a per-project summary. Coverage is never
//! merged across projects; summaries are reported side by side.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CoverageConfig;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("failed to read coverage record {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse coverage record {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid coverage exclude pattern: {0}")]
    Pattern(#[from] globset::Error),
}

/// Covered/total pair for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub covered: u64,
    #[serde(default)]
    pub total: u64,
}

impl Counter {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.covered as f64 * 100.0 / self.total as f64
        }
    }

    fn add(&mut self, other: Counter) {
        self.covered += other.covered;
        self.total += other.total;
    }
}

/// Per-project coverage totals plus a per-source-file line breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub lines: Counter,
    pub branches: Counter,
    pub functions: Counter,
    pub statements: Counter,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<String, Counter>,
}

/// One record as written by the provider.
#[derive(Debug, Default, Deserialize)]
struct ProviderRecord {
    #[serde(default)]
    lines: Counter,
    #[serde(default)]
    branches: Counter,
    #[serde(default)]
    functions: Counter,
    #[serde(default)]
    statements: Counter,

    /// Optional per-source-file line counters.
    #[serde(default)]
    files: BTreeMap<String, Counter>,
}

/// Merge every record the provider wrote into `dir`.
///
/// Sources matching the project's coverage exclude patterns are dropped from
/// the per-file breakdown and do not count toward line totals. When a record
/// carries a per-file map, its line totals are derived from the kept entries;
/// otherwise the record's top-level counters are used as-is.
pub fn collect(dir: &Path, config: &CoverageConfig) -> Result<CoverageSummary, CoverageError> {
    let exclude = compile_excludes(&config.exclude)?;
    let mut summary = CoverageSummary::default();

    let mut records: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect(),
        // The provider wrote nothing; report empty coverage rather than fail.
        Err(_) => return Ok(summary),
    };
    records.sort();

    for path in records {
        let content = std::fs::read_to_string(&path).map_err(|source| CoverageError::Read {
            path: path.clone(),
            source,
        })?;
        let record: ProviderRecord =
            serde_json::from_str(&content).map_err(|source| CoverageError::Parse {
                path: path.clone(),
                source,
            })?;
        merge_record(&mut summary, record, &exclude);
    }

    Ok(summary)
}

/// Write a project's summary to `<dir>/<project>.json`.
pub fn write_artifact(
    dir: &Path,
    project: &str,
    summary: &CoverageSummary,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{project}.json"));
    let content = serde_json::to_string_pretty(summary)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    std::fs::write(&path, content)?;
    Ok(path)
}

fn merge_record(summary: &mut CoverageSummary, record: ProviderRecord, exclude: &GlobSet) {
    summary.branches.add(record.branches);
    summary.functions.add(record.functions);
    summary.statements.add(record.statements);

    if record.files.is_empty() {
        summary.lines.add(record.lines);
        return;
    }

    for (source, counter) in record.files {
        if exclude.is_match(Path::new(&source)) {
            continue;
        }
        summary.lines.add(counter);
        summary.files.entry(source).or_default().add(counter);
    }
}

fn compile_excludes(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
