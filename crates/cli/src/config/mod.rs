// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading and validation.
//!
//! `polytest.toml` declares an ordered list of `[[project]]` tables plus
//! invocation-wide `[defaults]`. The file is loaded once at invocation start
//! and is immutable for the duration of the run. Schema errors abort the
//! invocation before any project executes.

mod project;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use globset::Glob;
use serde::Deserialize;
use thiserror::Error;

pub use project::{CoverageConfig, CoverageReporter, Environment, ProjectConfig};

/// The only config schema version this build understands.
pub const CONFIG_VERSION: u32 = 1;

/// Name of the configuration file discovered in the workspace.
pub const CONFIG_FILE: &str = "polytest.toml";

/// Errors that make a configuration unusable.
///
/// All of these are fatal before execution: no project runs and no report is
/// produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },

    #[error("unsupported config version {found} (this build supports version {CONFIG_VERSION})")]
    Version { found: u32 },

    #[error("duplicate project name `{name}`")]
    DuplicateName { name: String },

    #[error("project `{name}`: root directory {} does not exist", root.display())]
    MissingRoot { name: String, root: PathBuf },

    #[error("projects `{first}` and `{second}` claim the same root directory {}", root.display())]
    DuplicateRoot {
        first: String,
        second: String,
        root: PathBuf,
    },

    #[error("project `{name}`: include patterns must not be empty")]
    EmptyInclude { name: String },

    #[error("project `{name}`: runner command must not be empty")]
    EmptyRunner { name: String },

    #[error("project `{name}`: coverage provider must not be empty")]
    EmptyCoverageProvider { name: String },

    #[error("project `{name}`: invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        name: String,
        pattern: String,
        source: Box<globset::Error>,
    },

    #[error("no project named `{name}` is defined")]
    UnknownProject { name: String },
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config schema version. Must be [`CONFIG_VERSION`].
    pub version: u32,

    /// Invocation-wide fallbacks for per-project settings.
    #[serde(default)]
    pub defaults: Defaults,

    /// Ordered project definitions. Declaration order is report order.
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectConfig>,

    /// Directory containing the config file; project roots resolve against
    /// it. Populated by [`Config::load`], not by the file itself.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Invocation-wide fallbacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Defaults {
    /// Argv prefix used to execute setup and test files.
    pub runner: Vec<String>,

    /// Per-test-file wall-clock timeout in seconds.
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            runner: vec!["sh".to_string()],
            timeout: 30,
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a string, resolving roots against `base_dir`.
    ///
    /// Validation rules are identical to [`Config::load`].
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(content).map_err(|source| ConfigError::Parse {
                path: base_dir.join(CONFIG_FILE),
                source: Box::new(source),
            })?;
        config.base_dir = base_dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Absolute root directory for a project.
    pub fn resolved_root(&self, project: &ProjectConfig) -> PathBuf {
        if project.root.is_absolute() {
            project.root.clone()
        } else {
            self.base_dir.join(&project.root)
        }
    }

    /// Effective runner argv for a project (project override or defaults).
    pub fn runner_for(&self, project: &ProjectConfig) -> Vec<String> {
        project
            .runner
            .clone()
            .unwrap_or_else(|| self.defaults.runner.clone())
    }

    /// Effective per-file timeout for a project.
    pub fn timeout_for(&self, project: &ProjectConfig) -> Duration {
        Duration::from_secs(project.timeout.unwrap_or(self.defaults.timeout))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Version {
                found: self.version,
            });
        }

        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut seen_roots: HashMap<PathBuf, &str> = HashMap::new();

        for project in &self.projects {
            let name = project.name.as_str();

            if !seen_names.insert(name) {
                return Err(ConfigError::DuplicateName {
                    name: name.to_string(),
                });
            }

            let root = self.resolved_root(project);
            // Canonicalize so `a/b/..` and `a` collide; a root that cannot be
            // canonicalized does not exist.
            let canonical = root
                .canonicalize()
                .map_err(|_| ConfigError::MissingRoot {
                    name: name.to_string(),
                    root: root.clone(),
                })?;
            if !canonical.is_dir() {
                return Err(ConfigError::MissingRoot {
                    name: name.to_string(),
                    root,
                });
            }
            if let Some(first) = seen_roots.insert(canonical.clone(), name) {
                return Err(ConfigError::DuplicateRoot {
                    first: first.to_string(),
                    second: name.to_string(),
                    root: canonical,
                });
            }

            if project.include.is_empty() {
                return Err(ConfigError::EmptyInclude {
                    name: name.to_string(),
                });
            }

            if let Some(runner) = &project.runner
                && runner.is_empty()
            {
                return Err(ConfigError::EmptyRunner {
                    name: name.to_string(),
                });
            }

            for pattern in project.include.iter().chain(project.exclude.iter()) {
                compile_check(name, pattern)?;
            }

            if let Some(coverage) = &project.coverage {
                if coverage.provider.trim().is_empty() {
                    return Err(ConfigError::EmptyCoverageProvider {
                        name: name.to_string(),
                    });
                }
                for pattern in &coverage.exclude {
                    compile_check(name, pattern)?;
                }
            }
        }

        if self.defaults.runner.is_empty() {
            return Err(ConfigError::EmptyRunner {
                name: "<defaults>".to_string(),
            });
        }

        Ok(())
    }
}

fn compile_check(name: &str, pattern: &str) -> Result<(), ConfigError> {
    Glob::new(pattern).map(|_| ()).map_err(|source| ConfigError::Pattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
        source: Box::new(source),
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
