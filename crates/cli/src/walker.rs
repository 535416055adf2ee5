// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test-file discovery.
//!
//! Walks a project root and selects the files matching the project's include
//! patterns minus its exclude patterns, optionally narrowed further by the
//! invocation's `--filter` glob. Matching happens against project-relative
//! paths; results are sorted so discovery is deterministic.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::config::{ConfigError, ProjectConfig};

/// Compiled file-selection rules for one project.
pub struct TestFileWalker {
    include: GlobSet,
    exclude: GlobSet,
    filter: Option<GlobSet>,
}

impl TestFileWalker {
    /// Compile a project's patterns plus an optional invocation filter glob.
    pub fn new(project: &ProjectConfig, filter: Option<&GlobSet>) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile(&project.name, &project.include)?,
            exclude: compile(&project.name, &project.exclude)?,
            filter: filter.cloned(),
        })
    }

    /// Discover test files under `root`, sorted by project-relative path.
    ///
    /// Hidden files and gitignored files are not considered. Unreadable
    /// directory entries are skipped with a warning rather than failing the
    /// project.
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkBuilder::new(root).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry under {}: {err}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };

            if !self.include.is_match(relative) || self.exclude.is_match(relative) {
                continue;
            }
            if let Some(filter) = &self.filter
                && !filter.is_match(relative)
            {
                continue;
            }

            files.push(relative.to_path_buf());
        }

        files.sort();
        tracing::debug!("discovered {} test file(s) under {}", files.len(), root.display());
        files
    }
}

/// Compile a single invocation-level glob (e.g. `--filter`).
pub fn compile_filter(pattern: &str) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new(pattern)?);
    builder.build()
}

fn compile(project: &str, patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::Pattern {
            name: project.to_string(),
            pattern: pattern.clone(),
            source: Box::new(source),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::Pattern {
        name: project.to_string(),
        pattern: String::new(),
        source: Box::new(source),
    })
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
