// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Cross-platform path utilities for tests.

use std::path::{Path, PathBuf};

/// Cross-platform path utilities for test files.
pub struct TestPaths;

impl TestPaths {
    /// Normalize a path for cross-platform comparison.
    ///
    /// Uses dunce to handle Windows UNC paths (\\?\) so canonical paths
    /// compare equal to what the CLI prints.
    pub fn normalize(path: &Path) -> PathBuf {
        dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    /// Convert a path to a string suitable for command-line arguments.
    pub fn to_arg(path: &Path) -> String {
        Self::normalize(path).display().to_string()
    }

    /// Returns true if two paths refer to the same location.
    pub fn same_location(a: &Path, b: &Path) -> bool {
        Self::normalize(a) == Self::normalize(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_missing_path_is_unchanged() {
        let path = Path::new("/definitely/not/here");
        assert_eq!(TestPaths::normalize(path), path);
    }

    #[test]
    fn test_same_location_through_dot_segments() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir(&nested).unwrap();
        assert!(TestPaths::same_location(dir.path(), &nested.join("..")));
    }
}
