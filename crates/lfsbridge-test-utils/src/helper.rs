// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Stub helper programs for driver tests.
//!
//! Each stub is a small `sh` script written to a temporary directory. The
//! script is run as `/bin/sh <script> <mode>` rather than executed directly,
//! so a freshly written file is never exec'd while another test thread is
//! forking (which fails with `ETXTBSY` on Linux).

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Shell used to run stub scripts
pub const STUB_SHELL: &str = "/bin/sh";

/// A throwaway helper program with known behavior.
///
/// # Example
/// ```ignore
/// use lfsbridge_test_utils::StubHelper;
///
/// let stub = StubHelper::echo();
/// let helper = HelperCommand::new(stub.program()).with_args(stub.args());
/// ```
pub struct StubHelper {
    _dir: TempDir,
    script: PathBuf,
}

impl StubHelper {
    /// Creates a stub from an `sh` script body. `$1` is the filter mode.
    pub fn from_script(name: &str, body: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create stub directory");
        let script = dir.path().join(format!("{name}.sh"));
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("Failed to write stub script");
        Self { _dir: dir, script }
    }

    /// Copies stdin to stdout unchanged
    pub fn echo() -> Self {
        Self::from_script("echo", "exec cat")
    }

    /// Copies stdin to stdout with ASCII letters upper-cased
    pub fn uppercase() -> Self {
        Self::from_script("uppercase", "exec tr 'a-z' 'A-Z'")
    }

    /// Prints `<mode>:` and then echoes stdin
    pub fn mode_prefix() -> Self {
        Self::from_script("mode-prefix", "printf '%s:' \"$1\"\nexec cat")
    }

    /// Consumes stdin, writes a message to stderr and exits with `code`
    pub fn failing(code: i32) -> Self {
        Self::from_script(
            "failing",
            &format!("cat > /dev/null\necho 'stub helper failed' >&2\nexit {code}"),
        )
    }

    /// Never produces output and never exits on its own
    pub fn hanging() -> Self {
        Self::from_script("hanging", "exec sleep 60")
    }

    /// Program to launch
    pub fn program(&self) -> &Path {
        Path::new(STUB_SHELL)
    }

    /// Arguments placed before the filter mode
    pub fn args(&self) -> Vec<String> {
        vec![self.script.display().to_string()]
    }

    /// Path of the generated script
    pub fn script(&self) -> &Path {
        &self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_written_with_shebang() {
        let stub = StubHelper::echo();
        let content = fs::read_to_string(stub.script()).unwrap();
        assert!(content.starts_with("#!/bin/sh\n"));
        assert!(content.contains("exec cat"));
    }

    #[test]
    fn test_args_point_at_script() {
        let stub = StubHelper::failing(3);
        assert_eq!(stub.program(), Path::new(STUB_SHELL));
        assert_eq!(stub.args(), vec![stub.script().display().to_string()]);
        assert!(fs::read_to_string(stub.script()).unwrap().contains("exit 3"));
    }
}
