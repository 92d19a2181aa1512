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

//! Filter driver implementation
//!
//! The engine drives each matching file through four callbacks:
//!
//! - **Create**: spawn the helper for the file and record it by path
//! - **Clean** / **Smudge**: stream input bytes into the helper's stdin
//!   (possibly several times)
//! - **Complete**: close stdin, copy the helper's stdout to the engine,
//!   wait for exit, dispose, forget the path
//!
//! Nothing escapes a callback. Every failure is logged through `tracing`
//! and reported as a [`StageOutcome`]; the engine keeps processing other
//! files and later files are filtered normally.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lfsbridge_filter::{CommandBridge, ContentFilter, FeatureFlag, FilterDriver, FilterMode, HelperCommand};
//! use std::io::Cursor;
//! use std::path::Path;
//!
//! let driver = FilterDriver::new(CommandBridge::new(HelperCommand::default()), FeatureFlag::new(true));
//! let root = Path::new("/path/to/repo");
//! let mut pointer = Vec::new();
//!
//! driver.create("a.bin", root, FilterMode::Clean);
//! driver.clean("a.bin", root, &mut Cursor::new(b"HELLO"), &mut pointer);
//! let outcome = driver.complete("a.bin", root, &mut pointer);
//! assert!(outcome.is_success());
//! ```

use crate::bridge::ProcessBridge;
use crate::cancel::CancellationToken;
use crate::engine::ContentFilter;
use crate::error::{FilterError, FilterResult};
use crate::gate::EnablementGate;
use crate::mode::FilterMode;
use crate::session::FilterSession;
use crate::stream::CopyOutcome;
use crate::table::{lock_session, InvocationTable, SharedSession};
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, trace, warn};

/// What a single callback did.
#[derive(Debug)]
pub enum StageOutcome {
    /// The enablement gate was closed; nothing happened
    Bypassed,

    /// A helper was spawned and recorded for the path
    Created,

    /// Input bytes were written to the helper
    Streamed {
        /// Bytes written to the helper's stdin
        bytes: u64,
    },

    /// The helper's output was copied to the engine and the invocation ended
    Completed {
        /// Bytes written to the engine's output
        bytes: u64,
    },

    /// Shutdown was requested; any invocation involved has been cleaned up
    Cancelled,

    /// The call was dropped as a protocol violation (duplicate or missing
    /// invocation); existing state is untouched
    Skipped(FilterError),

    /// The invocation failed and has been cleaned up
    Failed(FilterError),
}

impl StageOutcome {
    /// True for `Created`, `Streamed` and `Completed`
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            StageOutcome::Created | StageOutcome::Streamed { .. } | StageOutcome::Completed { .. }
        )
    }

    /// Bytes moved by a `Streamed` or `Completed` stage
    pub fn bytes(&self) -> Option<u64> {
        match self {
            StageOutcome::Streamed { bytes } | StageOutcome::Completed { bytes } => Some(*bytes),
            _ => None,
        }
    }

    /// Error carried by `Skipped` or `Failed`
    pub fn error(&self) -> Option<&FilterError> {
        match self {
            StageOutcome::Skipped(e) | StageOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Large-file filter driver: one helper process per file, correlated by path
/// across the engine's callbacks.
pub struct FilterDriver {
    bridge: Arc<dyn ProcessBridge>,
    gate: Arc<dyn EnablementGate>,
    table: InvocationTable,
    shutdown: CancellationToken,
}

impl FilterDriver {
    /// Creates a driver spawning helpers through `bridge`, active while
    /// `gate` is open.
    pub fn new(bridge: impl ProcessBridge + 'static, gate: impl EnablementGate + 'static) -> Self {
        Self::with_shared(Arc::new(bridge), Arc::new(gate))
    }

    /// Creates a driver from already shared collaborators
    pub fn with_shared(bridge: Arc<dyn ProcessBridge>, gate: Arc<dyn EnablementGate>) -> Self {
        Self {
            bridge,
            gate,
            table: InvocationTable::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Uses `token` as the shutdown signal instead of a private one
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Current state of the enablement gate
    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Token that aborts in-flight copies and waits when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Requests cooperative shutdown of all in-flight invocations.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Number of invocations currently in flight
    pub fn in_flight(&self) -> usize {
        self.table.len()
    }

    /// Returns true if `path` has an active invocation
    pub fn is_tracking(&self, path: &str) -> bool {
        self.table.contains(path)
    }

    /// Sorted paths currently in flight
    pub fn in_flight_paths(&self) -> Vec<String> {
        self.table.paths()
    }

    /// Spawns a helper for `path` and returns the session without recording
    /// it, for hosts that carry the session through the stages themselves.
    ///
    /// # Errors
    ///
    /// [`FilterError::Disabled`] while the enablement gate is closed; nothing
    /// is spawned. Otherwise propagates spawn failures from the [`ProcessBridge`].
    pub fn begin(&self, path: &str, root: &Path, mode: FilterMode) -> FilterResult<FilterSession> {
        if !self.gate.is_enabled() {
            return Err(FilterError::Disabled);
        }
        let process = self.bridge.spawn(mode, root)?;
        Ok(FilterSession::new(path, mode, root, process))
    }

    fn stream(&self, path: &str, mode: FilterMode, input: &mut dyn Read) -> StageOutcome {
        if !self.gate.is_enabled() {
            trace!(path, %mode, "filter disabled, stage bypassed");
            return StageOutcome::Bypassed;
        }

        let Some(shared) = self.table.get(path) else {
            error!(path, %mode, "no process for path");
            return StageOutcome::Skipped(FilterError::MissingInvocation {
                path: path.to_string(),
            });
        };

        let result = {
            let mut session = lock_session(&shared);
            if session.mode() != mode {
                let mismatch = FilterError::ModeMismatch {
                    path: path.to_string(),
                    expected: session.mode(),
                    actual: mode,
                };
                warn!(path, error = %mismatch, "stage does not match invocation mode, continuing");
            }
            session.write(input, &self.shutdown)
        };

        match result {
            Ok(CopyOutcome::Finished { bytes }) => {
                trace!(path, %mode, bytes, "streamed input into helper");
                StageOutcome::Streamed { bytes }
            }
            Ok(CopyOutcome::Cancelled { bytes }) => {
                trace!(path, %mode, bytes, "streaming cancelled");
                self.abandon(path, &shared);
                StageOutcome::Cancelled
            }
            Err(e) => {
                error!(path, %mode, error = ?e, "failed to stream input into helper");
                self.abandon(path, &shared);
                StageOutcome::Failed(e)
            }
        }
    }

    /// Drops a failed invocation: forget the path (if it still maps to this
    /// session) and dispose of the helper.
    fn abandon(&self, path: &str, shared: &SharedSession) {
        self.table.remove_if_same(path, shared);
        lock_session(shared).dispose();
    }
}

impl ContentFilter for FilterDriver {
    fn create(&self, path: &str, root: &Path, mode: FilterMode) -> StageOutcome {
        if !self.gate.is_enabled() {
            trace!(path, %mode, "filter disabled, create bypassed");
            return StageOutcome::Bypassed;
        }
        if self.shutdown.is_cancelled() {
            trace!(path, %mode, "shutdown requested, create skipped");
            return StageOutcome::Cancelled;
        }

        // First invocation wins; don't start a helper we would have to throw away.
        if self.table.contains(path) {
            error!(path, %mode, "duplicate invocation");
            return StageOutcome::Skipped(FilterError::DuplicateInvocation {
                path: path.to_string(),
            });
        }

        let session = match self.begin(path, root, mode) {
            Ok(session) => session,
            Err(FilterError::Disabled) => {
                trace!(path, %mode, "filter disabled while creating, create bypassed");
                return StageOutcome::Bypassed;
            }
            Err(e) => {
                error!(path, %mode, error = ?e, "failed to start filter helper");
                return StageOutcome::Failed(e);
            }
        };
        let pid = session.process_id();

        match self.table.try_insert(path, Arc::new(Mutex::new(session))) {
            Ok(()) => {
                debug!(path, %mode, pid, "filter invocation created");
                StageOutcome::Created
            }
            Err(rejected) => {
                error!(path, %mode, pid, "duplicate invocation, discarding late helper");
                lock_session(&rejected).dispose();
                StageOutcome::Skipped(FilterError::DuplicateInvocation {
                    path: path.to_string(),
                })
            }
        }
    }

    fn clean(
        &self,
        path: &str,
        _root: &Path,
        input: &mut dyn Read,
        _output: &mut dyn Write,
    ) -> StageOutcome {
        self.stream(path, FilterMode::Clean, input)
    }

    fn smudge(
        &self,
        path: &str,
        _root: &Path,
        input: &mut dyn Read,
        _output: &mut dyn Write,
    ) -> StageOutcome {
        self.stream(path, FilterMode::Smudge, input)
    }

    fn complete(&self, path: &str, _root: &Path, output: &mut dyn Write) -> StageOutcome {
        if !self.gate.is_enabled() {
            trace!(path, "filter disabled, complete bypassed");
            return StageOutcome::Bypassed;
        }

        // Lookup and removal happen together: whatever happens below, the
        // path is no longer in flight.
        let Some(shared) = self.table.take(path) else {
            error!(path, "no process for path");
            return StageOutcome::Skipped(FilterError::MissingInvocation {
                path: path.to_string(),
            });
        };

        let mut session = lock_session(&shared);
        let mode = session.mode();
        let result = session.finish(output, &self.shutdown);
        session.dispose();
        drop(session);

        match result {
            Ok(bytes) => {
                debug!(path, %mode, bytes, "filter invocation completed");
                StageOutcome::Completed { bytes }
            }
            Err(FilterError::Cancelled) => {
                trace!(path, %mode, "filter invocation cancelled");
                StageOutcome::Cancelled
            }
            Err(e) => {
                error!(path, %mode, error = ?e, "filter invocation failed");
                StageOutcome::Failed(e)
            }
        }
    }
}

impl fmt::Debug for FilterDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDriver")
            .field("enabled", &self.gate.is_enabled())
            .field("in_flight", &self.table.paths())
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish()
    }
}
