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

//! # LfsBridge Filter Driver
//!
//! This crate implements the large-file filter driver of LfsBridge: the
//! component that sits between the version-control engine and the working
//! tree and hands each matching file to an external helper process
//! (`git-lfs clean` / `git-lfs smudge`).
//!
//! ## Architecture
//!
//! - **ProcessBridge**: spawns the helper with piped stdin/stdout/stderr
//! - **InvocationTable**: maps in-flight paths to their helper sessions
//! - **FilterDriver**: the Create → Clean/Smudge → Complete lifecycle
//! - **FilterRegistrar**: registers the named filter exactly once
//! - **EnablementGate**: external switch that turns the driver into a no-op
//!
//! ## Lifecycle
//!
//! ```text
//! Create(path)   spawn helper, record path → session
//! Clean(path)    copy input bytes into helper stdin   (repeatable)
//! Complete(path) close stdin, copy helper stdout to output,
//!                wait for exit, dispose, forget path
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lfsbridge_filter::{
//!     CommandBridge, ContentFilter, FeatureFlag, FilterDriver, FilterMode, HelperCommand,
//! };
//! use std::io::Cursor;
//! use std::path::Path;
//!
//! let driver = FilterDriver::new(CommandBridge::new(HelperCommand::default()), FeatureFlag::new(true));
//! let root = Path::new("/path/to/repo");
//! let mut output = Vec::new();
//!
//! driver.create("Assets/hero.psd", root, FilterMode::Clean);
//! driver.clean("Assets/hero.psd", root, &mut Cursor::new(vec![0u8; 4096]), &mut output);
//! driver.complete("Assets/hero.psd", root, &mut output);
//! ```

pub mod bridge;
pub mod cancel;
pub mod driver;
pub mod engine;
pub mod error;
pub mod gate;
pub mod git_registry;
pub mod mode;
pub mod registrar;
pub mod session;
pub mod stream;
pub mod table;

pub use bridge::{CommandBridge, HelperCommand, ProcessBridge, ProcessHandle, DEFAULT_HELPER_PROGRAM};
pub use cancel::CancellationToken;
pub use driver::{FilterDriver, StageOutcome};
pub use engine::{ContentFilter, FilterRegistry, InMemoryRegistry};
pub use error::{FilterError, FilterResult};
pub use gate::{AlwaysEnabled, EnablementGate, FeatureFlag};
pub use git_registry::{FilterCommands, GitRepositoryRegistry};
pub use mode::FilterMode;
pub use registrar::{FilterRegistrar, FilterRegistration, RegistrationOutcome, DEFAULT_FILTER_NAME};
pub use session::FilterSession;
pub use stream::CopyOutcome;
pub use table::InvocationTable;
