// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Init command implementation.

use crate::cli::InitArgs;
use crate::config::CONFIG_FILE;

const TEMPLATE: &str = r#"version = 1

[defaults]
runner = ["sh"]
timeout = 30

# One [[project]] per workspace. Declaration order is report order.
#
# [[project]]
# name = "web"
# root = "apps/web"
# environment = "dom"
# include = ["**/*.test.sh"]
# setup = ["test/setup.sh"]
#
# [[project]]
# name = "api"
# root = "apps/api"
# include = ["**/*.test.sh"]
"#;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    let path = std::env::current_dir()?.join(CONFIG_FILE);
    if path.exists() && !args.force {
        anyhow::bail!(
            "{CONFIG_FILE} already exists (use --force to overwrite)"
        );
    }
    std::fs::write(&path, TEMPLATE)?;
    println!("wrote {}", path.display());
    Ok(0)
}
