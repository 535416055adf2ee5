// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report command implementation.
//!
//! Re-renders the latest-report cache without running anything.

use std::path::PathBuf;

use crate::cli::ReportArgs;
use crate::discovery;
use crate::latest::{LatestReport, latest_path};
use crate::report::format_report;

pub fn run(cli_config: Option<PathBuf>, args: ReportArgs) -> anyhow::Result<i32> {
    let base_dir = base_dir(cli_config)?;
    let latest = LatestReport::load(&latest_path(&base_dir))?;
    print!("{}", format_report(args.output, latest.as_ref())?);
    Ok(0)
}

/// The directory holding `.polytest`: the config file's directory when one
/// can be found, the current directory otherwise.
fn base_dir(cli_config: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_config
        && let Some(parent) = path.parent()
    {
        return Ok(parent.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(discovery::find_config(&cwd)
        .and_then(|path| path.parent().map(|p| p.to_path_buf()))
        .unwrap_or(cwd))
}
