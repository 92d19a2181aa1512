// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! CLI command helpers for testing the lfsbridge binary.
//!
//! Provides convenient wrappers around assert_cmd.

use crate::helper::StubHelper;
use assert_cmd::Command;
use std::path::Path;

/// Creates a new lfsbridge Command for testing.
///
/// Inherited `LFSBRIDGE_*` variables are cleared so the host environment
/// cannot leak into a test.
///
/// # Example
/// ```ignore
/// use lfsbridge_test_utils::lfsbridge;
///
/// lfsbridge()
///     .arg("status")
///     .current_dir(repo.path())
///     .assert()
///     .success();
/// ```
#[allow(deprecated)] // cargo_bin is deprecated but still works for our use case
pub fn lfsbridge() -> Command {
    let mut cmd = Command::cargo_bin("lfsbridge").expect("lfsbridge binary not found");
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("LFSBRIDGE_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

/// Fluent API wrapper for common lfsbridge command patterns.
pub struct LfsbridgeCommand {
    cmd: Command,
}

impl LfsbridgeCommand {
    /// Create a new LfsbridgeCommand.
    pub fn new() -> Self {
        Self { cmd: lfsbridge() }
    }

    /// Set the working directory for the command.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    /// Add an argument to the command.
    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.arg(arg);
        self
    }

    /// Add multiple arguments to the command.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Set an environment variable for the command.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Route filtering through `stub` instead of `git-lfs`.
    pub fn with_helper(self, stub: &StubHelper) -> Self {
        let program = stub.program().display().to_string();
        let args = stub.args().join(" ");
        self.env("LFSBRIDGE_HELPER_PROGRAM", &program)
            .env("LFSBRIDGE_HELPER_ARGS", &args)
    }

    /// Bytes written to the command's stdin.
    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.cmd.write_stdin(input);
        self
    }

    /// Execute the command and assert success.
    pub fn run_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    /// Execute the command and assert failure.
    pub fn run_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    /// Get the underlying Command for custom assertions.
    pub fn into_inner(self) -> Command {
        self.cmd
    }
}

impl Default for LfsbridgeCommand {
    fn default() -> Self {
        Self::new()
    }
}
