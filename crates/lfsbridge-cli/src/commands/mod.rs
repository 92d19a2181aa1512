// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Command modules for the lfsbridge CLI

pub mod filter;
pub mod install;
pub mod status;
pub mod track;

pub use filter::FilterCmd;
pub use install::InstallCmd;
pub use status::StatusCmd;
pub use track::{TrackCmd, UntrackCmd};
