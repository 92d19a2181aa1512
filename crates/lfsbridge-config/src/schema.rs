// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Configuration schema
//!
//! ```toml
//! [filter]
//! name = "lfs"
//! patterns = ["*.psd", "Assets/**/*.fbx"]
//! enabled = true
//! required = true
//!
//! [helper]
//! program = "git-lfs"
//! args = []
//!
//! [observability]
//! log_level = "info"
//! log_format = "pretty"
//! ```

use crate::error::ConfigResult;
use crate::loader::ConfigLoader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding repository configuration
pub const CONFIG_DIR: &str = ".lfsbridge";

/// Configuration file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Filter registration and enablement
    pub filter: FilterConfig,

    /// Helper process launched per file
    pub helper: HelperConfig,

    /// Logging settings
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Location of the repository configuration file
    pub fn path(repo_root: impl AsRef<Path>) -> PathBuf {
        repo_root.as_ref().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load config from repository root, falling back to defaults when the
    /// file does not exist.
    pub async fn load(repo_root: impl AsRef<Path>) -> ConfigResult<Self> {
        let config_path = Self::path(repo_root);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "no repository configuration, using defaults");
            return Ok(Self::default());
        }

        ConfigLoader::new().load_file(&config_path).await
    }

    /// Like [`Config::load`], then applies `LFSBRIDGE_*` environment
    /// overrides and validates the result.
    pub async fn load_with_overrides(repo_root: impl AsRef<Path>) -> ConfigResult<Self> {
        let loader = ConfigLoader::new();
        let config_path = Self::path(repo_root);

        if config_path.exists() {
            loader.load_with_overrides(&config_path).await
        } else {
            loader.with_overrides(Self::default())
        }
    }

    /// Save config to repository root
    pub fn save(&self, repo_root: impl AsRef<Path>) -> ConfigResult<()> {
        let config_path = Self::path(repo_root);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, toml_str)?;
        Ok(())
    }
}

/// Filter registration settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Filter name used in `.gitattributes` (`filter=<name>`)
    #[serde(default = "default_filter_name")]
    pub name: String,

    /// Patterns registered on `install`
    #[serde(default)]
    pub patterns: Vec<String>,

    /// When false the filter host passes content through untouched
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Written as `filter.<name>.required`
    #[serde(default = "default_true")]
    pub required: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            name: default_filter_name(),
            patterns: Vec::new(),
            enabled: true,
            required: true,
        }
    }
}

/// Helper process settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HelperConfig {
    /// Program to launch; resolved through `PATH` when not absolute
    #[serde(default = "default_helper_program")]
    pub program: String,

    /// Arguments placed before the filter mode
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            program: default_helper_program(),
            args: Vec::new(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_filter_name() -> String {
    "lfs".to_string()
}

fn default_helper_program() -> String {
    "git-lfs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.filter.name, "lfs");
        assert!(config.filter.patterns.is_empty());
        assert!(config.filter.enabled);
        assert!(config.filter.required);
        assert_eq!(config.helper.program, "git-lfs");
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, "pretty");
    }

    #[test]
    fn test_path_under_config_dir() {
        let path = Config::path("/repo");
        assert_eq!(path, Path::new("/repo/.lfsbridge/config.toml"));
    }

    #[tokio::test]
    async fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.filter.patterns = vec!["*.psd".to_string(), "Audio/*.wav".to_string()];
        config.helper.args = vec!["--verbose".to_string()];
        config.observability.log_format = "json".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();

        assert_eq!(loaded, config);
    }
}
