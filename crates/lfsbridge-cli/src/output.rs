// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Shared output formatting for CLI commands.
//!
//! Everything except [`error`] goes to stdout, so the `filter` command must
//! never call these: its stdout carries file content.

use console::style;

/// Print a success message with a green checkmark.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message to stderr with a red cross.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print an informational message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").cyan(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow(), msg);
}

/// Print a detail line with key-value formatting.
///
/// ```text
///   Filter: lfs
///   Helper: git-lfs
/// ```
pub fn detail(key: &str, value: &str) {
    println!("  {}: {}", key, style(value).cyan());
}

/// Print a section header.
pub fn header(msg: &str) {
    println!("{}", style(msg).green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_functions_compile() {
        let _ = success;
        let _ = error;
        let _ = info;
        let _ = warning;
        let _ = detail;
        let _ = header;
    }
}
