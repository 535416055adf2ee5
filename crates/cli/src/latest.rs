// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Latest-report cache for local viewing.
//!
//! `.polytest/latest.json` caches the most recent run report so that
//! `polytest report` can re-render it without re-running anything. It is an
//! artifact of the previous invocation, never state the next run depends on.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::STATE_DIR;
use crate::results::RunReport;

/// The most recent run, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestReport {
    /// When the run completed (ISO 8601).
    pub updated: DateTime<Utc>,

    /// Git commit hash when the run was captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    /// The full run report.
    pub report: RunReport,
}

impl LatestReport {
    /// Save to file, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from file, returning None if not found.
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// Location of the cache relative to the config file's directory.
pub fn latest_path(base_dir: &Path) -> PathBuf {
    base_dir.join(STATE_DIR).join("latest.json")
}

/// Location of coverage artifacts relative to the config file's directory.
pub fn coverage_dir(base_dir: &Path) -> PathBuf {
    base_dir.join(STATE_DIR).join("coverage")
}

#[cfg(test)]
#[path = "latest_tests.rs"]
mod tests;
