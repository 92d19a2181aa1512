// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Direction of a filter transformation

use std::fmt;
use std::str::FromStr;

/// Direction of the transformation applied to a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Working tree → object store (e.g. large bytes become a pointer record)
    Clean,

    /// Object store → working tree
    Smudge,
}

impl FilterMode {
    /// Argument passed to the helper binary for this mode.
    pub fn as_arg(self) -> &'static str {
        match self {
            FilterMode::Clean => "clean",
            FilterMode::Smudge => "smudge",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clean" => Ok(FilterMode::Clean),
            "smudge" => Ok(FilterMode::Smudge),
            other => Err(format!("Unknown filter mode: {other}. Expected clean or smudge")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_arguments() {
        assert_eq!(FilterMode::Clean.as_arg(), "clean");
        assert_eq!(FilterMode::Smudge.as_arg(), "smudge");
        assert_eq!(FilterMode::Smudge.to_string(), "smudge");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("clean".parse::<FilterMode>(), Ok(FilterMode::Clean));
        assert_eq!("SMUDGE".parse::<FilterMode>(), Ok(FilterMode::Smudge));
        assert!("diff".parse::<FilterMode>().is_err());
    }
}
