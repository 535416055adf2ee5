// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use polytest::cli::{Cli, Command, RunArgs};

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "polytest=debug"
        } else {
            "polytest=warn"
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Some(Command::Run(args)) if args.verbose);
    init_tracing(verbose);

    let code = match cli.command {
        Some(Command::Run(args)) => polytest::cmd_run::run(cli.config, args)?,
        Some(Command::Report(args)) => polytest::cmd_report::run(cli.config, args)?,
        Some(Command::Init(args)) => polytest::cmd_init::run(args)?,
        Some(Command::Completions(args)) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "polytest", &mut io::stdout());
            0
        }
        // Bare `polytest` behaves like `polytest run` with defaults.
        None => polytest::cmd_run::run(cli.config, RunArgs::default())?,
    };

    std::process::exit(code)
}
