// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Install the filter driver into a git repository

use crate::output;
use crate::repo::RepoContext;
use anyhow::{Context, Result};
use clap::Args;
use lfsbridge_config::Config;
use lfsbridge_filter::{
    FilterCommands, FilterRegistrar, FilterRegistration, GitRepositoryRegistry,
    RegistrationOutcome,
};

#[derive(Debug, Args)]
pub struct InstallCmd {
    /// Pattern to route through the filter (repeatable), in addition to
    /// `filter.patterns` from the configuration
    #[arg(short, long = "pattern", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Reinstall even if the filter is already registered
    #[arg(short, long)]
    pub force: bool,
}

impl InstallCmd {
    pub fn execute(self, ctx: &RepoContext, config: &Config) -> Result<()> {
        let root = ctx.root().context("Run 'git init' first")?;
        let mut registry = GitRepositoryRegistry::open(&root)?;
        let name = config.filter.name.as_str();

        let mut patterns = config.filter.patterns.clone();
        for pattern in self.patterns {
            if !patterns.contains(&pattern) {
                patterns.push(pattern);
            }
        }
        let registration = FilterRegistration::new(name, &patterns)
            .context("Invalid filter registration")?;

        if self.force {
            registry.unregister(name)?;
        }

        let host = host_command()?;
        let outcome = FilterRegistrar::register(&mut registry, &registration, || {
            FilterCommands::for_host(&host).with_required(config.filter.required)
        })?;

        match outcome {
            RegistrationOutcome::Registered => {
                output::success(&format!("Installed filter '{}'", name));
                output::detail("Repository", &root.display().to_string());
                output::detail("Clean", &format!("{host} filter clean %f"));
                output::detail("Smudge", &format!("{host} filter smudge %f"));
                if patterns.is_empty() {
                    output::warning("No patterns tracked yet");
                    println!("  Use 'lfsbridge track <PATTERN>' to route files through the filter");
                } else {
                    output::detail("Patterns", &patterns.join(", "));
                }
            }
            RegistrationOutcome::AlreadyRegistered => {
                output::info(&format!("Filter '{}' already installed", name));
                println!("  Use --force to reinstall");
            }
        }

        Ok(())
    }
}

/// Command git should run to reach this binary, quoted if needed.
fn host_command() -> Result<String> {
    let exe = std::env::current_exe().context("Failed to get lfsbridge executable path")?;
    let exe = dunce::canonicalize(&exe).unwrap_or(exe);
    let exe = exe.display().to_string().replace('\\', "/");

    if exe.contains(char::is_whitespace) {
        Ok(format!("\"{exe}\""))
    } else {
        Ok(exe)
    }
}
