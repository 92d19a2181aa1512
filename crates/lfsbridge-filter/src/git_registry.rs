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

//! Filter registration inside a git repository
//!
//! Git finds filters through two places:
//!
//! - **Repository config**: `filter.<name>.clean`, `filter.<name>.smudge` and
//!   `filter.<name>.required` name the commands git runs
//! - **.gitattributes**: `<pattern> filter=<name> diff=<name> merge=<name> -text`
//!   routes matching paths through the filter
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lfsbridge_filter::{FilterCommands, FilterRegistrar, FilterRegistration, GitRepositoryRegistry};
//! use std::path::Path;
//!
//! let mut registry = GitRepositoryRegistry::open(Path::new("/path/to/repo"))?;
//! let registration = FilterRegistration::lfs(["*.psd"])?;
//! FilterRegistrar::register(&mut registry, &registration, || FilterCommands::for_host("lfsbridge"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::engine::FilterRegistry;
use crate::error::{FilterError, FilterResult};
use crate::registrar::FilterRegistration;
use git2::{Config, ConfigLevel, ErrorCode, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Commands git runs for a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommands {
    /// Command for `filter.<name>.clean`
    pub clean: String,

    /// Command for `filter.<name>.smudge`
    pub smudge: String,

    /// Value of `filter.<name>.required` (git aborts when a required filter fails)
    pub required: bool,
}

impl FilterCommands {
    /// Commands that route git through the `filter` subcommand of `host`
    pub fn for_host(host: &str) -> Self {
        Self {
            clean: format!("{host} filter clean %f"),
            smudge: format!("{host} filter smudge %f"),
            required: true,
        }
    }

    /// Sets the `required` flag
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// [`FilterRegistry`] backed by a git repository's config and `.gitattributes`.
pub struct GitRepositoryRegistry {
    root: PathBuf,
    repo: Repository,
}

impl GitRepositoryRegistry {
    /// Opens the repository at `repo_path`
    ///
    /// # Errors
    ///
    /// [`FilterError::RepositoryNotFound`] if `repo_path` is not a git repository.
    pub fn open(repo_path: &Path) -> FilterResult<Self> {
        let repo = Repository::open(repo_path).map_err(|e| {
            FilterError::RepositoryNotFound(format!("{}: {}", repo_path.display(), e))
        })?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo_path.to_path_buf());
        Ok(Self { root, repo })
    }

    /// Working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn gitattributes_path(&self) -> PathBuf {
        self.root.join(".gitattributes")
    }

    /// Repository-local config only; filters installed in the global or
    /// system config are not seen.
    fn local_config(&self) -> FilterResult<Config> {
        Ok(self.repo.config()?.open_level(ConfigLevel::Local)?)
    }

    fn read_gitattributes(&self) -> FilterResult<String> {
        let path = self.gitattributes_path();
        if !path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&path).map_err(|e| FilterError::Gitattributes(e.to_string()))
    }

    /// Commands configured for `name`, if any
    pub fn commands(&self, name: &str) -> FilterResult<Option<FilterCommands>> {
        let config = self.local_config()?;
        let clean = match config.get_string(&format!("filter.{name}.clean")) {
            Ok(value) => value,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let smudge = config
            .get_string(&format!("filter.{name}.smudge"))
            .unwrap_or_default();
        let required = config
            .get_bool(&format!("filter.{name}.required"))
            .unwrap_or(false);

        Ok(Some(FilterCommands {
            clean,
            smudge,
            required,
        }))
    }

    /// Adds `pattern` to `.gitattributes` for filter `name`. No-op if present.
    pub fn track_pattern(&self, name: &str, pattern: &str) -> FilterResult<bool> {
        if pattern.trim().is_empty() || pattern.chars().any(char::is_whitespace) {
            return Err(FilterError::Gitattributes(format!("invalid pattern '{pattern}'")));
        }

        let mut content = self.read_gitattributes()?;
        if is_tracked_line_present(&content, name, pattern) {
            debug!(filter = name, pattern, "pattern already tracked");
            return Ok(false);
        }

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&attribute_line(name, pattern));
        content.push('\n');

        fs::write(self.gitattributes_path(), content)
            .map_err(|e| FilterError::Gitattributes(e.to_string()))?;

        info!(filter = name, pattern, "pattern added to .gitattributes");
        Ok(true)
    }

    /// Removes `pattern` for filter `name` from `.gitattributes`.
    ///
    /// Returns false if the pattern was not tracked.
    pub fn untrack_pattern(&self, name: &str, pattern: &str) -> FilterResult<bool> {
        let content = self.read_gitattributes()?;
        if !is_tracked_line_present(&content, name, pattern) {
            debug!(filter = name, pattern, "pattern not tracked");
            return Ok(false);
        }

        let mut kept: String = content
            .lines()
            .filter(|line| !line_tracks(line, name, pattern))
            .collect::<Vec<_>>()
            .join("\n");
        if !kept.is_empty() {
            kept.push('\n');
        }

        fs::write(self.gitattributes_path(), kept)
            .map_err(|e| FilterError::Gitattributes(e.to_string()))?;

        info!(filter = name, pattern, "pattern removed from .gitattributes");
        Ok(true)
    }

    /// Patterns routed through filter `name`, in file order
    pub fn tracked_patterns(&self, name: &str) -> FilterResult<Vec<String>> {
        let content = self.read_gitattributes()?;
        let attribute = format!("filter={name}");
        Ok(content
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let pattern = fields.next()?;
                fields
                    .any(|field| field == attribute)
                    .then(|| pattern.to_string())
            })
            .filter(|pattern| !pattern.starts_with('#'))
            .collect())
    }

    /// Removes the filter's commands from the repository config.
    ///
    /// `.gitattributes` is left alone so tracked patterns survive a reinstall.
    pub fn unregister(&self, name: &str) -> FilterResult<()> {
        let mut config = self.local_config()?;
        for key in ["clean", "smudge", "required"] {
            match config.remove(&format!("filter.{name}.{key}")) {
                Ok(()) => {}
                Err(e) if e.code() == ErrorCode::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!(filter = name, "filter removed from repository config");
        Ok(())
    }
}

impl FilterRegistry for GitRepositoryRegistry {
    type Filter = FilterCommands;

    fn contains(&self, name: &str) -> bool {
        match self.commands(name) {
            Ok(commands) => commands.is_some(),
            Err(e) => {
                debug!(filter = name, error = %e, "could not read filter config");
                false
            }
        }
    }

    fn register(
        &mut self,
        registration: &FilterRegistration,
        filter: FilterCommands,
    ) -> FilterResult<()> {
        let name = registration.name();
        info!(filter = name, root = %self.root.display(), "installing filter in repository");

        let mut config = self.local_config()?;
        config.set_str(&format!("filter.{name}.clean"), &filter.clean)?;
        config.set_str(&format!("filter.{name}.smudge"), &filter.smudge)?;
        config.set_bool(&format!("filter.{name}.required"), filter.required)?;

        for pattern in registration.patterns() {
            self.track_pattern(name, pattern)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for GitRepositoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepositoryRegistry")
            .field("root", &self.root)
            .finish()
    }
}

fn attribute_line(name: &str, pattern: &str) -> String {
    format!("{pattern} filter={name} diff={name} merge={name} -text")
}

fn line_tracks(line: &str, name: &str, pattern: &str) -> bool {
    let mut fields = line.split_whitespace();
    fields.next() == Some(pattern) && fields.any(|field| field == format!("filter={name}"))
}

fn is_tracked_line_present(content: &str, name: &str, pattern: &str) -> bool {
    content.lines().any(|line| line_tracks(line, name, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrar::{FilterRegistrar, RegistrationOutcome};
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepositoryRegistry) {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();
        let registry = GitRepositoryRegistry::open(temp_dir.path()).unwrap();
        (temp_dir, registry)
    }

    #[test]
    fn test_open_nonexistent_repo() {
        let temp_dir = TempDir::new().unwrap();
        let result = GitRepositoryRegistry::open(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(FilterError::RepositoryNotFound(_))));
    }

    #[test]
    fn test_register_writes_config_and_attributes() {
        let (temp_dir, mut registry) = init_repo();
        let registration = FilterRegistration::lfs(["*.psd", "*.fbx"]).unwrap();

        registry
            .register(&registration, FilterCommands::for_host("lfsbridge"))
            .unwrap();

        assert!(registry.contains("lfs"));
        let commands = registry.commands("lfs").unwrap().unwrap();
        assert_eq!(commands.clean, "lfsbridge filter clean %f");
        assert_eq!(commands.smudge, "lfsbridge filter smudge %f");
        assert!(commands.required);

        let content = fs::read_to_string(temp_dir.path().join(".gitattributes")).unwrap();
        assert!(content.contains("*.psd filter=lfs diff=lfs merge=lfs -text"));
        assert!(content.contains("*.fbx filter=lfs diff=lfs merge=lfs -text"));
    }

    #[test]
    fn test_registrar_is_idempotent_in_repository() {
        let (temp_dir, mut registry) = init_repo();
        let registration = FilterRegistration::lfs(["*.psd"]).unwrap();
        let make = || FilterCommands::for_host("lfsbridge");

        let first = FilterRegistrar::register(&mut registry, &registration, make).unwrap();
        let second = FilterRegistrar::register(&mut registry, &registration, make).unwrap();

        assert_eq!(first, RegistrationOutcome::Registered);
        assert_eq!(second, RegistrationOutcome::AlreadyRegistered);
        let content = fs::read_to_string(temp_dir.path().join(".gitattributes")).unwrap();
        assert_eq!(content.matches("*.psd filter=lfs").count(), 1);
    }

    #[test]
    fn test_track_pattern_duplicate() {
        let (_temp_dir, registry) = init_repo();

        assert!(registry.track_pattern("lfs", "*.psd").unwrap());
        assert!(!registry.track_pattern("lfs", "*.psd").unwrap());
        assert_eq!(registry.tracked_patterns("lfs").unwrap(), vec!["*.psd"]);
    }

    #[test]
    fn test_untrack_pattern_keeps_other_lines() {
        let (temp_dir, registry) = init_repo();
        fs::write(temp_dir.path().join(".gitattributes"), "*.txt text\n").unwrap();
        registry.track_pattern("lfs", "*.psd").unwrap();
        registry.track_pattern("lfs", "*.wav").unwrap();

        assert!(registry.untrack_pattern("lfs", "*.psd").unwrap());

        let content = fs::read_to_string(temp_dir.path().join(".gitattributes")).unwrap();
        assert_eq!(content, "*.txt text\n*.wav filter=lfs diff=lfs merge=lfs -text\n");
        assert_eq!(registry.tracked_patterns("lfs").unwrap(), vec!["*.wav"]);
    }

    #[test]
    fn test_untrack_nonexistent_pattern() {
        let (_temp_dir, registry) = init_repo();
        assert!(!registry.untrack_pattern("lfs", "*.psd").unwrap());
    }

    #[test]
    fn test_unregister_removes_commands() {
        let (_temp_dir, mut registry) = init_repo();
        let registration = FilterRegistration::lfs(Vec::<String>::new()).unwrap();
        registry
            .register(&registration, FilterCommands::for_host("lfsbridge"))
            .unwrap();

        registry.unregister("lfs").unwrap();
        assert!(!registry.contains("lfs"));
    }
}
