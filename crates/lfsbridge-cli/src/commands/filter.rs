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

//! Git filter driver commands (clean and smudge)
//!
//! Git runs `lfsbridge filter clean %f` once per matching file with the
//! content on stdin and reads the result from stdout. Each run drives one
//! Create, Clean/Smudge, Complete cycle through a [`FilterDriver`].

use crate::repo::RepoContext;
use anyhow::{Context, Result};
use clap::Subcommand;
use lfsbridge_config::Config;
use lfsbridge_filter::{
    CancellationToken, CommandBridge, ContentFilter, FeatureFlag, FilterDriver, FilterMode,
    HelperCommand, StageOutcome,
};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, debug_span, warn};

/// Path used when git does not pass `%f`
const STDIN_PATH: &str = "<stdin>";

#[derive(Debug, Subcommand)]
pub enum FilterCmd {
    /// Clean filter: working-tree content to stored content (git add)
    Clean {
        /// File path being cleaned
        #[arg(value_name = "FILE")]
        file_path: Option<String>,
    },

    /// Smudge filter: stored content to working-tree content (git checkout)
    Smudge {
        /// File path being smudged
        #[arg(value_name = "FILE")]
        file_path: Option<String>,
    },
}

impl FilterCmd {
    fn mode(&self) -> FilterMode {
        match self {
            FilterCmd::Clean { .. } => FilterMode::Clean,
            FilterCmd::Smudge { .. } => FilterMode::Smudge,
        }
    }

    fn file_path(&self) -> &str {
        match self {
            FilterCmd::Clean { file_path } | FilterCmd::Smudge { file_path } => {
                file_path.as_deref().unwrap_or(STDIN_PATH)
            }
        }
    }

    pub async fn execute(self, ctx: &RepoContext, config: &Config) -> Result<()> {
        let mode = self.mode();
        let path = self.file_path().to_string();
        let root = ctx.root_or_start();
        let helper = HelperCommand::new(&config.helper.program).with_args(config.helper.args.clone());
        let enabled = config.filter.enabled;

        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        let signal = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling filter");
                signal_token.cancel();
            }
        });

        let result = tokio::task::spawn_blocking(move || {
            let driver = FilterDriver::new(CommandBridge::new(helper), FeatureFlag::new(enabled))
                .with_shutdown_token(shutdown);
            run_filter(&driver, mode, &path, &root)
        })
        .await
        .context("Filter task panicked");

        signal.abort();
        result?
    }
}

/// Runs one file through `driver` from stdin to stdout.
fn run_filter(driver: &FilterDriver, mode: FilterMode, path: &str, root: &Path) -> Result<()> {
    let _span = debug_span!("filter", %mode, path).entered();
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();

    match driver.create(path, root, mode) {
        StageOutcome::Bypassed => {
            debug!("filter disabled, passing content through");
            io::copy(&mut input, &mut output).context("Failed to pass content through")?;
            output.flush()?;
            return Ok(());
        }
        outcome => check("create", path, outcome)?,
    }

    let streamed = match mode {
        FilterMode::Clean => driver.clean(path, root, &mut input, &mut output),
        FilterMode::Smudge => driver.smudge(path, root, &mut input, &mut output),
    };
    check(mode.as_arg(), path, streamed)?;

    check("complete", path, driver.complete(path, root, &mut output))
}

fn check(stage: &str, path: &str, outcome: StageOutcome) -> Result<()> {
    match outcome {
        StageOutcome::Created
        | StageOutcome::Streamed { .. }
        | StageOutcome::Completed { .. }
        | StageOutcome::Bypassed => Ok(()),
        StageOutcome::Cancelled => anyhow::bail!("{stage} cancelled for {path}"),
        StageOutcome::Skipped(e) | StageOutcome::Failed(e) => {
            Err(anyhow::Error::new(e).context(format!("{stage} failed for {path}")))
        }
    }
}

