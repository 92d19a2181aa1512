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

//! Configuration for the LfsBridge filter host
//!
//! # Features
//!
//! - Multi-format configuration support (TOML, YAML, JSON)
//! - Repository configuration at `.lfsbridge/config.toml`
//! - Environment variable overrides with `LFSBRIDGE_` prefix
//! - Validation with field-level error messages
//!
//! # Example
//!
//! ```no_run
//! use lfsbridge_config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_with_overrides(".").await?;
//!
//!     println!("filter '{}' runs {}", config.filter.name, config.helper.program);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

// Re-export commonly used items
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, ENV_PREFIX};
pub use schema::*;
pub use validation::{Validator, VALID_LOG_FORMATS, VALID_LOG_LEVELS};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"git-lfs\""));
        assert!(json.contains("\"lfs\""));
    }

    #[test]
    fn test_toml_output_has_sections() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml.contains("[filter]"));
        assert!(toml.contains("[helper]"));
        assert!(toml.contains("[observability]"));
    }
}
