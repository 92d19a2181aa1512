// Copyright (C) 2026  LfsBridge Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
// SPDX-License-Identifier: AGPL-3.0

mod commands;
mod output;
mod repo;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::*;
use lfsbridge_config::Config;
use lfsbridge_observability::{init_tracing_with_config, LogConfig, LogFormat};
use repo::RepoContext;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lfsbridge")]
#[command(version, about = "Large-file filter driver for git")]
#[command(
    long_about = "LfsBridge routes matching files through a per-file helper process
(git-lfs by default) when git cleans or smudges them."
)]
#[command(propagate_version = true)]
#[command(author = "LfsBridge Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Colored output (always|auto|never)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Repository path
    #[arg(short = 'C', long, global = true, value_name = "PATH")]
    repository: Option<PathBuf>,

    /// Configuration file (TOML, YAML or JSON) instead of .lfsbridge/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Git filter driver operations (clean/smudge)
    #[command(subcommand)]
    Filter(FilterCmd),

    /// Install the filter driver into the repository
    Install(InstallCmd),

    /// Track patterns with the filter
    Track(TrackCmd),

    /// Untrack patterns
    Untrack(UntrackCmd),

    /// Show filter installation status
    Status(StatusCmd),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color.as_str() {
        "never" => console::set_colors_enabled(false),
        "always" => console::set_colors_enabled(true),
        "auto" => {}
        _ => {
            output::error(&format!("Invalid color option: {}", cli.color));
            std::process::exit(1);
        }
    }

    if let Err(e) = run(cli).await {
        output::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    let ctx = RepoContext::new(cli.repository, cli.config)?;
    let config = ctx.load_config().await?;

    if !cli.quiet {
        // Logging may already be set up by an embedding host; keep going.
        init_logging(&config, cli.verbose).ok();
    }

    match cli.command {
        Commands::Filter(cmd) => cmd.execute(&ctx, &config).await,
        Commands::Install(cmd) => cmd.execute(&ctx, &config),
        Commands::Track(cmd) => cmd.execute(&ctx, &config),
        Commands::Untrack(cmd) => cmd.execute(&ctx, &config),
        Commands::Status(cmd) => cmd.execute(&ctx, &config),
        Commands::Version => Ok(()),
    }
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else {
        config.observability.log_level.as_str()
    };
    let format: LogFormat = config
        .observability
        .log_format
        .parse()
        .context("Invalid observability.log_format")?;

    let log_config = LogConfig::new()
        .with_format(format)
        .with_level(level.to_lowercase())
        .with_color(console::colors_enabled_stderr());

    init_tracing_with_config(log_config)?;
    Ok(())
}

fn print_version() {
    println!("lfsbridge {}", env!("CARGO_PKG_VERSION"));
    println!("Large-file filter driver for git");
}
