// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Error types for the filter driver

use crate::mode::FilterMode;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Error types for filter driver operations
///
/// The per-file callbacks never return these across the host boundary; they
/// are carried inside [`StageOutcome`](crate::driver::StageOutcome) and logged.
/// The registry layer returns them directly.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Create was called again for a path that is still in flight
    #[error("Duplicate invocation for path: {path}")]
    DuplicateInvocation {
        /// Path that already has an active invocation
        path: String,
    },

    /// A stage was called for a path without an active invocation
    #[error("No process for path: {path}")]
    MissingInvocation {
        /// Path that was looked up
        path: String,
    },

    /// The stage invoked does not match the mode recorded at Create
    #[error("Mode mismatch for {path}: created as {expected}, invoked as {actual}")]
    ModeMismatch {
        /// Path of the invocation
        path: String,
        /// Mode recorded at Create
        expected: FilterMode,
        /// Stage actually invoked
        actual: FilterMode,
    },

    /// The helper process could not be started
    #[error("Failed to spawn helper '{program}': {source}")]
    Spawn {
        /// Helper program that failed to start
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The working directory handed to the bridge is not a directory
    #[error("Invalid working directory: {}", .0.display())]
    InvalidWorkingDirectory(PathBuf),

    /// I/O failure while copying bytes to or from the helper
    #[error("Stream failure for {path}: {source}")]
    Stream {
        /// Path of the invocation
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The helper exited unsuccessfully
    #[error("Helper for {path} exited with {status}")]
    HelperExit {
        /// Path of the invocation
        path: String,
        /// Exit status reported by the OS
        status: ExitStatus,
    },

    /// Cooperative cancellation was requested
    #[error("Operation cancelled")]
    Cancelled,

    /// The enablement gate was closed when a helper was requested
    #[error("Filter is disabled")]
    Disabled,

    /// Filter registration failed
    #[error("Filter registration failed: {0}")]
    Registration(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// .gitattributes configuration error
    #[error("Failed to configure .gitattributes: {0}")]
    Gitattributes(String),

    /// Repository not initialized
    #[error("Repository not initialized at path: {0}")]
    RepositoryNotFound(String),
}

impl FilterError {
    /// Builds a [`FilterError::Stream`] for `path`.
    pub fn stream(path: impl Into<String>, source: std::io::Error) -> Self {
        FilterError::Stream {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors that are part of an orderly teardown.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FilterError::Cancelled)
    }
}
