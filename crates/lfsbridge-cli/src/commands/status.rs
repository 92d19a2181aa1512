// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Show filter installation and configuration status

use crate::output;
use crate::repo::RepoContext;
use anyhow::Result;
use clap::Args;
use lfsbridge_config::Config;
use lfsbridge_filter::GitRepositoryRegistry;

#[derive(Debug, Args)]
pub struct StatusCmd {}

impl StatusCmd {
    pub fn execute(self, ctx: &RepoContext, config: &Config) -> Result<()> {
        let root = ctx.root()?;
        let registry = GitRepositoryRegistry::open(&root)?;
        let name = config.filter.name.as_str();

        output::header("LfsBridge status");
        output::detail("Repository", &root.display().to_string());
        output::detail("Filter", name);

        match registry.commands(name)? {
            Some(commands) => {
                output::detail("Installed", "yes");
                output::detail("Clean", &commands.clean);
                output::detail("Smudge", &commands.smudge);
                output::detail("Required", &commands.required.to_string());
            }
            None => output::detail("Installed", "no"),
        }

        output::detail("Enabled", if config.filter.enabled { "yes" } else { "no" });
        let mut helper = vec![config.helper.program.clone()];
        helper.extend(config.helper.args.iter().cloned());
        output::detail("Helper", &helper.join(" "));

        let tracked = registry.tracked_patterns(name)?;
        if tracked.is_empty() {
            output::detail("Tracked patterns", "none");
        } else {
            output::detail("Tracked patterns", &tracked.join(", "));
        }

        Ok(())
    }
}
