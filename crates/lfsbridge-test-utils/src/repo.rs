// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Test repository helper for integration tests.
//!
//! Provides a TestRepo struct that manages a temporary directory, optionally
//! initialized as a git repository.

use git2::{ConfigLevel, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test repository with automatic cleanup.
///
/// # Example
/// ```ignore
/// use lfsbridge_test_utils::TestRepo;
///
/// let repo = TestRepo::initialized();
/// repo.write_file("Assets/hero.psd", b"layers");
/// assert!(repo.gitattributes().is_empty());
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
}

impl TestRepo {
    /// Create a new empty test directory (not initialized as a repo).
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a new test directory and initialize it as a git repository.
    pub fn initialized() -> Self {
        let repo = Self::new();
        Repository::init(repo.path()).expect("Failed to initialize git repository");
        repo
    }

    /// Get the path to the repository directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the .lfsbridge directory.
    pub fn lfsbridge_dir(&self) -> PathBuf {
        self.temp_dir.path().join(".lfsbridge")
    }

    /// Write a file to the repository.
    pub fn write_file(&self, name: &str, content: &[u8]) {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Write `.lfsbridge/config.toml`.
    pub fn write_config(&self, toml: &str) {
        self.write_file(".lfsbridge/config.toml", toml.as_bytes());
    }

    /// Read a file from the repository.
    pub fn read_file(&self, name: &str) -> Vec<u8> {
        fs::read(self.temp_dir.path().join(name)).expect("Failed to read file")
    }

    /// Check if a file exists in the repository.
    pub fn file_exists(&self, name: &str) -> bool {
        self.temp_dir.path().join(name).exists()
    }

    /// Contents of `.gitattributes`, empty if it does not exist.
    pub fn gitattributes(&self) -> String {
        fs::read_to_string(self.temp_dir.path().join(".gitattributes")).unwrap_or_default()
    }

    /// Value of `key` in the repository-local git config.
    pub fn git_config(&self, key: &str) -> Option<String> {
        let repo = Repository::open(self.path()).ok()?;
        let config = repo.config().ok()?.open_level(ConfigLevel::Local).ok()?;
        config.get_string(key).ok()
    }

    /// Get the path to a file in the repository.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_creation() {
        let repo = TestRepo::new();
        assert!(repo.path().exists());
        assert!(!repo.file_exists(".git"));
    }

    #[test]
    fn test_initialized_repo_has_git_dir() {
        let repo = TestRepo::initialized();
        assert!(repo.file_exists(".git"));
        assert_eq!(repo.git_config("filter.lfs.clean"), None);
    }

    #[test]
    fn test_nested_file_creation() {
        let repo = TestRepo::new();
        repo.write_file("path/to/nested/file.bin", b"content");
        assert_eq!(repo.read_file("path/to/nested/file.bin"), b"content");
    }

    #[test]
    fn test_missing_gitattributes_reads_empty() {
        let repo = TestRepo::initialized();
        assert_eq!(repo.gitattributes(), "");
    }
}
