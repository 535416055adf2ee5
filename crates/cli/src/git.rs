// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Git utilities for report provenance.
//!
//! Uses git2 (libgit2) so stamping a report with the current commit does not
//! cost a subprocess.

use std::path::Path;

use git2::Repository;

/// Short hash of HEAD for the repository containing `root`, if any.
///
/// Returns `None` outside a repository or on an unborn branch; a report
/// without provenance is better than a failed run.
pub fn head_commit(root: &Path) -> Option<String> {
    let repo = Repository::discover(root).ok()?;
    let head = repo.head().ok()?;
    let oid = head.target()?;
    Some(oid.to_string()[..7].to_string())
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
