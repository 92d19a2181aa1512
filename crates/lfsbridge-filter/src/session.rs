// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! One file's pass through the filter
//!
//! A [`FilterSession`] owns the helper process for a single path from Create
//! until Complete. Hosts that can carry a value between callbacks use it
//! directly through [`FilterDriver::begin`](crate::FilterDriver::begin); the
//! path-keyed callbacks keep sessions in the
//! [`InvocationTable`](crate::InvocationTable).

use crate::bridge::ProcessHandle;
use crate::cancel::CancellationToken;
use crate::error::{FilterError, FilterResult};
use crate::mode::FilterMode;
use crate::stream::{copy_with_cancel, CopyOutcome};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// An in-flight invocation: path, mode, and the helper it exclusively owns.
#[derive(Debug)]
pub struct FilterSession {
    path: String,
    mode: FilterMode,
    root: PathBuf,
    process: ProcessHandle,
}

impl FilterSession {
    /// Wraps a freshly spawned helper
    pub fn new(
        path: impl Into<String>,
        mode: FilterMode,
        root: impl Into<PathBuf>,
        process: ProcessHandle,
    ) -> Self {
        Self {
            path: path.into(),
            mode,
            root: root.into(),
            process,
        }
    }

    /// Path being filtered
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Mode recorded at Create
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Repository root the helper runs in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// OS process id of the helper
    pub fn process_id(&self) -> u32 {
        self.process.id()
    }

    /// Returns true once the helper has been disposed
    pub fn is_disposed(&self) -> bool {
        self.process.is_disposed()
    }

    /// Streams all of `input` into the helper's stdin and flushes it.
    ///
    /// Stdin stays open so further chunks can follow before [`finish`](Self::finish).
    pub fn write<R>(&mut self, input: &mut R, cancel: &CancellationToken) -> FilterResult<CopyOutcome>
    where
        R: Read + ?Sized,
    {
        let stdin = self
            .process
            .input()
            .map_err(|e| FilterError::stream(&self.path, e))?;

        copy_with_cancel(input, stdin, cancel).map_err(|e| FilterError::stream(&self.path, e))
    }

    /// Closes stdin, copies the helper's stdout into `output`, and waits for
    /// the helper to exit. Returns the number of bytes written to `output`.
    ///
    /// # Errors
    ///
    /// [`FilterError::Cancelled`] if `cancel` fires while draining or waiting,
    /// [`FilterError::Stream`] on I/O failure, and [`FilterError::HelperExit`]
    /// if the helper exits unsuccessfully after its output was copied.
    pub fn finish<W>(&mut self, output: &mut W, cancel: &CancellationToken) -> FilterResult<u64>
    where
        W: Write + ?Sized,
    {
        self.process
            .close_input()
            .map_err(|e| FilterError::stream(&self.path, e))?;

        let bytes = match self
            .process
            .drain_output(output, cancel)
            .map_err(|e| FilterError::stream(&self.path, e))?
        {
            CopyOutcome::Finished { bytes } => bytes,
            CopyOutcome::Cancelled { .. } => return Err(FilterError::Cancelled),
        };

        let status = self
            .process
            .wait_for_exit(cancel)
            .map_err(|e| FilterError::stream(&self.path, e))?
            .ok_or(FilterError::Cancelled)?;

        if status.success() {
            return Ok(bytes);
        }

        if let Some(stderr) = self.process.collect_stderr() {
            warn!(path = %self.path, stderr = %stderr, "helper reported errors");
        }
        Err(FilterError::HelperExit {
            path: self.path.clone(),
            status,
        })
    }

    /// Kills the helper if needed and releases its pipes. Idempotent.
    pub fn dispose(&mut self) {
        self.process.dispose();
    }
}
