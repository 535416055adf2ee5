// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Watch mode plumbing.
//!
//! A notify watcher feeds raw file-system events into a channel; updates are
//! debounced and classified as either a config change (reload everything) or
//! a set of affected projects (re-run just those). Changes under the state
//! directory are the dispatcher's own artifacts and never trigger a re-run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, unbounded};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::STATE_DIR;

/// Quiet window after the first event before acting on a batch.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// A debounced batch of changes, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum WatchUpdate {
    /// The config file itself changed; reload and re-run everything.
    ConfigChanged,
    /// Files under these projects' roots changed.
    Projects(BTreeSet<String>),
}

/// Live watcher over the config file and the resolved project roots.
pub struct WatchSession {
    // Dropping the watcher stops event delivery; hold it for the session.
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<notify::Event>>,
    config_path: PathBuf,
    roots: Vec<(String, PathBuf)>,
}

impl WatchSession {
    /// Watch `config_path`'s directory (non-recursively) plus every project
    /// root (recursively). `roots` must be absolute.
    pub fn new(config_path: &Path, roots: Vec<(String, PathBuf)>) -> notify::Result<Self> {
        let (tx, rx) = unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = tx.send(res);
        })?;

        if let Some(dir) = config_path.parent() {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }
        for (_, root) in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }

        Ok(Self {
            _watcher: watcher,
            rx,
            config_path: config_path.to_path_buf(),
            roots,
        })
    }

    /// Block until a relevant batch of changes arrives.
    ///
    /// Returns None when the watcher backend shut down.
    pub fn next_update(&self) -> Option<WatchUpdate> {
        loop {
            let first = self.rx.recv().ok()?;
            let mut paths = event_paths(first);

            // Collect everything arriving inside the quiet window.
            loop {
                match self.rx.recv_timeout(DEBOUNCE) {
                    Ok(event) => paths.extend(event_paths(event)),
                    Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
                }
            }

            if paths.iter().any(|path| self.is_config_path(path)) {
                return Some(WatchUpdate::ConfigChanged);
            }
            let affected = affected_projects(&paths, &self.roots);
            if !affected.is_empty() {
                return Some(WatchUpdate::Projects(affected));
            }
            // The whole batch was noise; keep waiting.
        }
    }

    fn is_config_path(&self, path: &Path) -> bool {
        path == self.config_path
            || (path.file_name() == self.config_path.file_name()
                && path.parent() == self.config_path.parent())
    }
}

/// Map changed paths to the projects whose roots contain them.
///
/// Paths under the state directory are dispatcher artifacts and are ignored,
/// so a run can never re-trigger itself.
pub fn affected_projects(paths: &[PathBuf], roots: &[(String, PathBuf)]) -> BTreeSet<String> {
    let mut affected = BTreeSet::new();
    for path in paths {
        if is_state_path(path) {
            continue;
        }
        for (name, root) in roots {
            if path.starts_with(root) {
                affected.insert(name.clone());
            }
        }
    }
    affected
}

/// True when the path is inside a `.polytest` state directory.
pub fn is_state_path(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == STATE_DIR)
}

fn event_paths(res: notify::Result<notify::Event>) -> Vec<PathBuf> {
    match res {
        Ok(event) => event.paths,
        Err(err) => {
            tracing::warn!("watch error: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
