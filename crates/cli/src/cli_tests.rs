#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use clap::Parser;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::parse_from(args)
}

#[test]
fn bare_invocation_has_no_subcommand() {
    let cli = parse(&["polytest"]);
    assert!(cli.command.is_none());
}

#[test]
fn run_collects_repeated_projects() {
    let cli = parse(&[
        "polytest", "run", "--project", "web", "--project", "api", "--coverage",
    ]);
    let Some(Command::Run(args)) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.projects, ["web", "api"]);
    assert!(args.coverage);
    assert!(!args.watch);
}

#[test]
fn run_accepts_filter_and_grep() {
    let cli = parse(&["polytest", "run", "--filter", "**/*.test.sh", "--grep", "button"]);
    let Some(Command::Run(args)) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.filter.as_deref(), Some("**/*.test.sh"));
    assert_eq!(args.grep.as_deref(), Some("button"));
}

#[test]
fn no_color_overrides_color_mode() {
    let cli = parse(&["polytest", "run", "--color", "always", "--no-color"]);
    let Some(Command::Run(args)) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.color_mode(), crate::color::ColorMode::Never);
}

#[test]
fn config_flag_is_global() {
    let cli = parse(&["polytest", "run", "--config", "custom.toml"]);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.toml")));
}

#[test]
fn run_args_default_matches_bare_run() {
    let args = RunArgs::default();
    assert!(args.projects.is_empty());
    assert!(args.filter.is_none());
    assert!(!args.coverage);
    assert_eq!(args.output, OutputFormat::Text);
}
