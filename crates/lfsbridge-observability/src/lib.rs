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

//! # LfsBridge Observability
//!
//! Structured logging for the LfsBridge binaries, built on `tracing` and
//! `tracing-subscriber`. Library crates only emit events through `tracing`;
//! the host decides where they go by calling one of the init functions once
//! at startup.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lfsbridge_observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Compact, Some("debug"))?;
//! tracing::info!("filter host started");
//! # Ok::<(), lfsbridge_observability::LogError>(())
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{build_subscriber, init_tracing, init_tracing_with_config};

/// Tracing re-exports for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level};
