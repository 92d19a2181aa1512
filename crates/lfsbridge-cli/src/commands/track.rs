// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Track/untrack file patterns in .gitattributes

use crate::output;
use crate::repo::RepoContext;
use anyhow::{Context, Result};
use clap::Args;
use console::style;
use lfsbridge_config::Config;
use lfsbridge_filter::{FilterRegistration, GitRepositoryRegistry};

#[derive(Debug, Args)]
pub struct TrackCmd {
    /// File pattern to track (e.g., "*.psd", "Assets/**/*.fbx")
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Show tracked patterns without adding new ones
    #[arg(short, long)]
    pub list: bool,
}

impl TrackCmd {
    pub fn execute(self, ctx: &RepoContext, config: &Config) -> Result<()> {
        let registry = GitRepositoryRegistry::open(&ctx.root()?)?;
        let name = config.filter.name.as_str();

        if self.list {
            return list_tracked_patterns(&registry, name);
        }

        let pattern = self.pattern.context(
            "Pattern required. Use --list to see tracked patterns or provide a pattern to track.",
        )?;
        // Same rules as install.
        FilterRegistration::new(name, [&pattern]).context("Invalid pattern")?;

        if registry.track_pattern(name, &pattern)? {
            output::success(&format!("Now tracking: {}", style(&pattern).yellow()));
            if registry.commands(name)?.is_none() {
                println!("  Run 'lfsbridge install' to set up the filter driver");
            }
        } else {
            output::info(&format!("Pattern already tracked: {}", style(&pattern).yellow()));
        }

        Ok(())
    }
}

fn list_tracked_patterns(registry: &GitRepositoryRegistry, name: &str) -> Result<()> {
    let tracked = registry.tracked_patterns(name)?;

    if tracked.is_empty() {
        output::info("No tracked patterns found");
        println!("  Use 'lfsbridge track <PATTERN>' to start tracking large files");
    } else {
        output::header("Tracked patterns:");
        for pattern in tracked {
            println!("  {}", style(pattern).yellow());
        }
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct UntrackCmd {
    /// File pattern to untrack
    #[arg(value_name = "PATTERN")]
    pub pattern: String,
}

impl UntrackCmd {
    pub fn execute(self, ctx: &RepoContext, config: &Config) -> Result<()> {
        let registry = GitRepositoryRegistry::open(&ctx.root()?)?;

        if registry.untrack_pattern(&config.filter.name, &self.pattern)? {
            output::success(&format!("No longer tracking: {}", style(&self.pattern).yellow()));
        } else {
            output::info(&format!("Pattern not tracked: {}", style(&self.pattern).yellow()));
        }

        Ok(())
    }
}
