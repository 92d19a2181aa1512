// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Custom test assertions for LfsBridge tests.

use crate::repo::TestRepo;

/// Assert that the filter `name` is installed in the repository-local config.
pub fn assert_filter_installed(repo: &TestRepo, name: &str) {
    let clean = repo.git_config(&format!("filter.{name}.clean"));
    let smudge = repo.git_config(&format!("filter.{name}.smudge"));
    assert!(
        clean.is_some() && smudge.is_some(),
        "filter '{}' should be installed (clean={:?}, smudge={:?})",
        name,
        clean,
        smudge
    );
}

/// Assert that the filter `name` is not installed.
pub fn assert_filter_not_installed(repo: &TestRepo, name: &str) {
    let clean = repo.git_config(&format!("filter.{name}.clean"));
    assert!(clean.is_none(), "filter '{}' should not be installed", name);
}

/// Assert that `.gitattributes` routes `pattern` through the filter `name`.
pub fn assert_pattern_tracked(repo: &TestRepo, pattern: &str, name: &str) {
    let attributes = repo.gitattributes();
    let tracked = attributes.lines().any(|line| {
        let mut fields = line.split_whitespace();
        fields.next() == Some(pattern) && fields.any(|f| f == format!("filter={name}"))
    });
    assert!(
        tracked,
        "pattern '{}' should be tracked by '{}' in .gitattributes:\n{}",
        pattern,
        name,
        attributes
    );
}

/// Assert that `.gitattributes` has no filter line for `pattern`.
pub fn assert_pattern_not_tracked(repo: &TestRepo, pattern: &str) {
    let attributes = repo.gitattributes();
    let tracked = attributes.lines().any(|line| {
        let mut fields = line.split_whitespace();
        fields.next() == Some(pattern) && fields.any(|f| f.starts_with("filter="))
    });
    assert!(
        !tracked,
        "pattern '{}' should not be tracked in .gitattributes:\n{}",
        pattern,
        attributes
    );
}
