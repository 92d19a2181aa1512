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

//! Helper process bridge
//!
//! Spawns the external helper (`git-lfs` by default) as
//! `<program> [args...] clean|smudge` with all three standard streams piped.
//!
//! ## Pipes
//!
//! - **stdin** is written by the driver during Clean/Smudge and closed at Complete
//! - **stdout** is read continuously by a pump thread into a channel, so the
//!   helper never stalls on a full pipe while input is still being written.
//!   The channel is unbounded: whatever the helper emits before Complete is
//!   held in memory until Complete drains it. `git-lfs` writes a small
//!   pointer on clean, but a helper that echoes its input buffers the whole
//!   file. Bounding the channel would let the helper block on stdout and stop
//!   reading stdin, which deadlocks the driver's write.
//! - **stderr** is drained by a second thread and logged when the process ends

use crate::cancel::CancellationToken;
use crate::error::{FilterError, FilterResult};
use crate::mode::FilterMode;
use crate::stream::{CopyOutcome, COPY_BUFFER_SIZE};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Default helper binary
pub const DEFAULT_HELPER_PROGRAM: &str = "git-lfs";

/// Interval at which blocking waits re-check the cancellation token
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long disposal waits for the stderr drain thread before detaching it
const STDERR_GRACE: Duration = Duration::from_millis(250);

type Chunk = io::Result<Vec<u8>>;

/// Helper program and the arguments placed before the mode argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl HelperCommand {
    /// Creates a command for `program` with no extra arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds arguments passed before `clean`/`smudge`
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Helper program
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments placed before the mode argument
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for HelperCommand {
    fn default() -> Self {
        Self::new(DEFAULT_HELPER_PROGRAM)
    }
}

/// Starts helper processes for filter invocations.
pub trait ProcessBridge: Send + Sync {
    /// Launches the helper for `mode` rooted at `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidWorkingDirectory`] if `working_dir` is not
    /// a directory and [`FilterError::Spawn`] if the process cannot start.
    fn spawn(&self, mode: FilterMode, working_dir: &Path) -> FilterResult<ProcessHandle>;
}

/// [`ProcessBridge`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Default)]
pub struct CommandBridge {
    helper: HelperCommand,
}

impl CommandBridge {
    /// Creates a bridge launching `helper`
    pub fn new(helper: HelperCommand) -> Self {
        Self { helper }
    }

    /// Helper command launched by this bridge
    pub fn helper(&self) -> &HelperCommand {
        &self.helper
    }
}

impl ProcessBridge for CommandBridge {
    fn spawn(&self, mode: FilterMode, working_dir: &Path) -> FilterResult<ProcessHandle> {
        if !working_dir.is_dir() {
            return Err(FilterError::InvalidWorkingDirectory(working_dir.to_path_buf()));
        }

        let program = self.helper.program().display().to_string();
        let mut command = Command::new(self.helper.program());
        command
            .args(self.helper.args())
            .arg(mode.as_arg())
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        hide_console_window(&mut command);

        debug!(
            program = %program,
            %mode,
            cwd = %working_dir.display(),
            "spawning filter helper"
        );

        let child = command.spawn().map_err(|source| FilterError::Spawn {
            program: program.clone(),
            source,
        })?;

        ProcessHandle::attach(child, program)
    }
}

#[cfg(windows)]
fn hide_console_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console_window(_command: &mut Command) {}

/// A running helper process and its three pipes.
///
/// Dropping the handle disposes it: stdin is closed and a process that is
/// still running is killed and reaped.
#[derive(Debug)]
pub struct ProcessHandle {
    program: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<Receiver<Chunk>>,
    stdout_pump: Option<JoinHandle<()>>,
    stderr_pump: Option<JoinHandle<Vec<u8>>>,
    status: Option<ExitStatus>,
    disposed: bool,
}

impl ProcessHandle {
    /// Takes ownership of a child spawned with piped stdin and stdout and
    /// starts the output pump threads.
    pub fn attach(mut child: Child, program: impl Into<String>) -> FilterResult<Self> {
        let program = program.into();
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let mut handle = Self {
            program,
            child,
            stdin,
            stdout: None,
            stdout_pump: None,
            stderr_pump: None,
            status: None,
            disposed: false,
        };

        let Some(stdout) = stdout else {
            return Err(FilterError::Spawn {
                program: handle.program.clone(),
                source: io::Error::new(ErrorKind::BrokenPipe, "helper stdout was not captured"),
            });
        };
        if handle.stdin.is_none() {
            return Err(FilterError::Spawn {
                program: handle.program.clone(),
                source: io::Error::new(ErrorKind::BrokenPipe, "helper stdin was not captured"),
            });
        }

        let (sender, receiver) = mpsc::channel();
        handle.stdout = Some(receiver);
        handle.stdout_pump = Some(
            thread::Builder::new()
                .name("lfs-helper-stdout".to_string())
                .spawn(move || pump_stdout(stdout, sender))?,
        );

        if let Some(stderr) = stderr {
            handle.stderr_pump = Some(
                thread::Builder::new()
                    .name("lfs-helper-stderr".to_string())
                    .spawn(move || drain_stderr(stderr))?,
            );
        }

        Ok(handle)
    }

    /// OS process id of the helper
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Helper program this handle was spawned from
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Exit status, once the helper has been reaped
    pub fn status(&self) -> Option<ExitStatus> {
        self.status
    }

    /// Returns true after [`dispose`](Self::dispose) has run
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Writable end of the helper's stdin.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::BrokenPipe`] once the input has been closed.
    pub fn input(&mut self) -> io::Result<&mut ChildStdin> {
        self.stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(ErrorKind::BrokenPipe, "helper stdin already closed"))
    }

    /// Flushes and closes stdin, signalling end of data to the helper.
    pub fn close_input(&mut self) -> io::Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin.flush()?;
        }
        Ok(())
    }

    /// Copies everything the helper writes to stdout into `output` until the
    /// helper closes its stdout, then flushes `output`.
    ///
    /// Waits in [`POLL_INTERVAL`] steps so a silent helper does not hide a
    /// cancellation request.
    pub fn drain_output<W>(
        &mut self,
        output: &mut W,
        cancel: &CancellationToken,
    ) -> io::Result<CopyOutcome>
    where
        W: Write + ?Sized,
    {
        let mut bytes = 0u64;
        let Some(receiver) = self.stdout.as_ref() else {
            output.flush()?;
            return Ok(CopyOutcome::Finished { bytes });
        };

        loop {
            if cancel.is_cancelled() {
                return Ok(CopyOutcome::Cancelled { bytes });
            }

            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(chunk)) => {
                    output.write_all(&chunk)?;
                    bytes += chunk.len() as u64;
                }
                Ok(Err(e)) => return Err(e),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.stdout = None;
        if let Some(pump) = self.stdout_pump.take() {
            if pump.join().is_err() {
                warn!(program = %self.program, "helper stdout pump panicked");
            }
        }

        output.flush()?;
        Ok(CopyOutcome::Finished { bytes })
    }

    /// Waits for the helper to exit.
    ///
    /// Returns `Ok(None)` if `cancel` fired first; the process is left running
    /// for [`dispose`](Self::dispose) to kill.
    pub fn wait_for_exit(&mut self, cancel: &CancellationToken) -> io::Result<Option<ExitStatus>> {
        if let Some(status) = self.status {
            return Ok(Some(status));
        }

        loop {
            if let Some(status) = self.child.try_wait()? {
                trace!(program = %self.program, ?status, "helper exited");
                self.status = Some(status);
                return Ok(Some(status));
            }
            if cancel.is_cancelled() {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Collects whatever the helper wrote to stderr.
    ///
    /// Only meaningful after the helper has exited; gives up after a short
    /// grace period if the pipe is still held open.
    pub fn collect_stderr(&mut self) -> Option<String> {
        let pump = self.stderr_pump.take()?;
        let deadline = Instant::now() + STDERR_GRACE;
        while !pump.is_finished() {
            if Instant::now() >= deadline {
                return None;
            }
            thread::sleep(Duration::from_millis(5));
        }

        let bytes = pump.join().ok()?;
        let text = String::from_utf8_lossy(&bytes).trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    /// Closes all pipes and kills the helper if it is still running.
    ///
    /// Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.stdin = None;

        if self.status.is_none() {
            match self.child.try_wait() {
                Ok(Some(status)) => self.status = Some(status),
                _ => {
                    debug!(program = %self.program, pid = self.child.id(), "killing helper process");
                    if let Err(e) = self.child.kill() {
                        trace!(program = %self.program, error = %e, "kill failed");
                    }
                    self.status = self.child.wait().ok();
                    // Pump threads end on their own once the pipes close.
                    self.stdout = None;
                    self.stdout_pump = None;
                    self.stderr_pump = None;
                    return;
                }
            }
        }

        self.stdout = None;
        if let Some(stderr) = self.collect_stderr() {
            debug!(program = %self.program, stderr = %stderr, "helper stderr output");
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn pump_stdout(mut stdout: ChildStdout, sender: Sender<Chunk>) {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        match stdout.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                if sender.send(Ok(buffer[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                // Receiver may already be gone; nothing left to report to.
                sender.send(Err(e)).ok();
                break;
            }
        }
    }
}

fn drain_stderr(mut stderr: ChildStderr) -> Vec<u8> {
    let mut buffer = Vec::new();
    stderr.read_to_end(&mut buffer).ok();
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_helper_command_default() {
        let helper = HelperCommand::default();
        assert_eq!(helper.program(), Path::new(DEFAULT_HELPER_PROGRAM));
        assert!(helper.args().is_empty());
    }

    #[test]
    fn test_helper_command_with_args() {
        let helper = HelperCommand::new("git").with_args(["lfs"]);
        assert_eq!(helper.program(), Path::new("git"));
        assert_eq!(helper.args(), ["lfs".to_string()]);
    }

    #[test]
    fn test_spawn_rejects_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");
        let bridge = CommandBridge::default();

        let result = bridge.spawn(FilterMode::Clean, &missing);
        assert!(matches!(result, Err(FilterError::InvalidWorkingDirectory(_))));
    }

    #[test]
    fn test_spawn_unknown_program() {
        let temp_dir = TempDir::new().unwrap();
        let bridge = CommandBridge::new(HelperCommand::new("lfsbridge-no-such-helper-binary"));

        let result = bridge.spawn(FilterMode::Smudge, temp_dir.path());
        assert!(matches!(result, Err(FilterError::Spawn { .. })));
    }
}
