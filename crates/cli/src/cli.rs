// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::color::ColorMode;

/// A multi-project test dispatcher for monorepo workspaces
#[derive(Parser)]
#[command(name = "polytest")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "POLYTEST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run project test suites
    Run(RunArgs),
    /// Render the report from the most recent run
    Report(ReportArgs),
    /// Initialize polytest configuration
    Init(InitArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(clap::Args, Default)]
pub struct RunArgs {
    /// Run only the named project (repeatable)
    #[arg(long = "project", value_name = "NAME")]
    pub projects: Vec<String>,

    /// Run only test files whose project-relative path matches this glob
    #[arg(long, value_name = "GLOB")]
    pub filter: Option<String>,

    /// Report only test cases whose name matches this regex; others are
    /// marked skipped
    #[arg(long, value_name = "REGEX")]
    pub grep: Option<String>,

    /// Collect coverage for projects that declare a coverage section
    #[arg(long)]
    pub coverage: bool,

    /// Re-run affected projects on file changes until interrupted
    #[arg(long)]
    pub watch: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Color output mode
    #[arg(long, default_value = "auto", value_name = "WHEN")]
    pub color: ColorMode,

    /// Disable color output (shorthand for --color=never)
    #[arg(long)]
    pub no_color: bool,

    /// Validate config and exit without running any project
    #[arg(long = "config-only")]
    pub config_only: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl RunArgs {
    /// Effective color mode after applying the `--no-color` shorthand.
    pub fn color_mode(&self) -> ColorMode {
        if self.no_color {
            ColorMode::Never
        } else {
            self.color
        }
    }
}

#[derive(clap::Args)]
pub struct ReportArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Overwrite existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
