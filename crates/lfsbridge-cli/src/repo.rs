// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Repository discovery and configuration loading shared by all commands

use anyhow::{Context, Result};
use lfsbridge_config::{Config, ConfigLoader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a command runs and which configuration it uses.
#[derive(Debug, Clone)]
pub struct RepoContext {
    start: PathBuf,
    config_file: Option<PathBuf>,
}

impl RepoContext {
    /// Starts from `-C <PATH>` if given, else the current directory.
    pub fn new(repository: Option<PathBuf>, config_file: Option<PathBuf>) -> Result<Self> {
        let start = match repository {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        let start = dunce::canonicalize(&start)
            .with_context(|| format!("Invalid repository path: {}", start.display()))?;

        Ok(Self { start, config_file })
    }

    /// Root of the enclosing git working tree
    pub fn root(&self) -> Result<PathBuf> {
        find_repo_root_from(&self.start)
    }

    /// Repository root, or the start directory outside a repository
    pub fn root_or_start(&self) -> PathBuf {
        self.root().unwrap_or_else(|_| self.start.clone())
    }

    /// Loads `--config` if given, else `.lfsbridge/config.toml` of the
    /// enclosing repository, else defaults; `LFSBRIDGE_*` overrides apply in
    /// every case.
    pub async fn load_config(&self) -> Result<Config> {
        if let Some(file) = &self.config_file {
            debug!(path = %file.display(), "loading configuration file");
            return ConfigLoader::new()
                .load_with_overrides(file)
                .await
                .with_context(|| format!("Failed to load configuration from {}", file.display()));
        }

        match self.root() {
            Ok(root) => Config::load_with_overrides(&root)
                .await
                .with_context(|| format!("Failed to load configuration for {}", root.display())),
            Err(_) => ConfigLoader::new()
                .with_overrides(Config::default())
                .context("Invalid configuration overrides"),
        }
    }
}

/// Find the root of the git working tree by walking up from `start`.
pub fn find_repo_root_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(".git").exists() {
            return Ok(current);
        }

        if !current.pop() {
            anyhow::bail!("Not a git repository (or any parent up to mount point)");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_root_from_nested_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("Assets/Art");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_repo_root_from(&nested).unwrap(), dir.path());
    }

    #[test]
    fn test_context_outside_repository_falls_back_to_start() {
        let dir = TempDir::new().unwrap();
        let ctx = RepoContext::new(Some(dir.path().to_path_buf()), None).unwrap();

        // A temp dir is normally not inside a git working tree.
        if ctx.root().is_err() {
            assert_eq!(ctx.root_or_start(), dunce::canonicalize(dir.path()).unwrap());
        }
    }

    #[test]
    fn test_context_rejects_missing_path() {
        let result = RepoContext::new(Some(PathBuf::from("/definitely/not/here")), None);
        assert!(result.is_err());
    }
}
