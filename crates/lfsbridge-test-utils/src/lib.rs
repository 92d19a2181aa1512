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

//! # LfsBridge Test Utilities
//!
//! Shared test utilities for LfsBridge crates providing:
//! - Stub helper programs standing in for `git-lfs`
//! - Git repository fixtures backed by temporary directories
//! - Capture of `tracing` diagnostics emitted during a test
//! - CLI command helpers for testing the `lfsbridge` binary
//! - Cross-platform path utilities

pub mod assertions;
pub mod cli;
pub mod diagnostics;
pub mod helper;
pub mod platform;
pub mod repo;

// Re-export commonly used items at crate root
pub use assertions::*;
pub use cli::{lfsbridge, LfsbridgeCommand};
pub use diagnostics::{capture_diagnostics, CapturedEvent, DiagnosticCapture};
pub use helper::StubHelper;
pub use platform::TestPaths;
pub use repo::TestRepo;
