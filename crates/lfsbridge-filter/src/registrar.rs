// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Idempotent filter registration
//!
//! ```rust
//! use lfsbridge_filter::{FilterRegistrar, FilterRegistration, InMemoryRegistry, RegistrationOutcome};
//! use lfsbridge_filter::{AlwaysEnabled, CommandBridge, ContentFilter, FilterDriver};
//! use std::sync::Arc;
//!
//! let mut registry = InMemoryRegistry::new();
//! let registration = FilterRegistration::lfs(["*.psd", "Assets/**/*.fbx"])?;
//!
//! let make = || Arc::new(FilterDriver::new(CommandBridge::default(), AlwaysEnabled)) as Arc<dyn ContentFilter>;
//! assert_eq!(FilterRegistrar::register(&mut registry, &registration, make)?, RegistrationOutcome::Registered);
//! assert_eq!(FilterRegistrar::register(&mut registry, &registration, make)?, RegistrationOutcome::AlreadyRegistered);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::engine::FilterRegistry;
use crate::error::{FilterError, FilterResult};
use glob::{MatchOptions, Pattern};
use tracing::{debug, info};

/// Default filter name, as used in `.gitattributes` (`filter=lfs`)
pub const DEFAULT_FILTER_NAME: &str = "lfs";

/// A filter name and the path patterns routed through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRegistration {
    name: String,
    patterns: Vec<Pattern>,
}

impl FilterRegistration {
    /// Creates a registration, compiling every pattern.
    ///
    /// # Errors
    ///
    /// [`FilterError::Registration`] for an empty or malformed name, or a
    /// pattern that is not a valid glob.
    pub fn new<I, S>(name: impl Into<String>, patterns: I) -> FilterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(FilterError::Registration(format!(
                "invalid filter name '{name}'"
            )));
        }

        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                if p.trim().is_empty() || p.chars().any(char::is_whitespace) {
                    return Err(FilterError::Registration(format!("invalid pattern '{p}'")));
                }
                Pattern::new(p)
                    .map_err(|e| FilterError::Registration(format!("invalid pattern '{p}': {e}")))
            })
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(Self { name, patterns })
    }

    /// Registration under [`DEFAULT_FILTER_NAME`]
    pub fn lfs<I, S>(patterns: I) -> FilterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(DEFAULT_FILTER_NAME, patterns)
    }

    /// Filter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Patterns as written
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::as_str)
    }

    /// Returns true if `path` is routed through this filter.
    ///
    /// Patterns without a `/` match the file name anywhere in the tree;
    /// patterns with a `/` match the whole repository-relative path.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        let path = path.trim_start_matches('/');
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        self.patterns.iter().any(|pattern| {
            let raw = pattern.as_str();
            if raw.contains('/') {
                let anchored = raw.trim_start_matches('/');
                Pattern::new(anchored)
                    .map(|p| p.matches_with(path, options))
                    .unwrap_or(false)
            } else {
                pattern.matches_with(file_name, options)
            }
        })
    }
}

/// Result of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The filter was added to the registry
    Registered,

    /// A filter with the same name was already present; nothing changed
    AlreadyRegistered,
}

/// Registers the named filter with an engine registry exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterRegistrar;

impl FilterRegistrar {
    /// Registers the filter built by `make_filter` unless `registry` already
    /// knows a filter with the registration's name. `make_filter` is only
    /// called when registration actually happens.
    ///
    /// Safe to call on every reload.
    pub fn register<R, F>(
        registry: &mut R,
        registration: &FilterRegistration,
        make_filter: F,
    ) -> FilterResult<RegistrationOutcome>
    where
        R: FilterRegistry,
        F: FnOnce() -> R::Filter,
    {
        if registry.contains(registration.name()) {
            debug!(filter = registration.name(), "filter already registered");
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        registry.register(registration, make_filter())?;
        info!(
            filter = registration.name(),
            patterns = ?registration.patterns().collect::<Vec<_>>(),
            "filter registered"
        );
        Ok(RegistrationOutcome::Registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct CountingRegistry {
        registered: HashMap<String, u32>,
    }

    impl FilterRegistry for CountingRegistry {
        type Filter = u32;

        fn contains(&self, name: &str) -> bool {
            self.registered.contains_key(name)
        }

        fn register(&mut self, registration: &FilterRegistration, filter: u32) -> FilterResult<()> {
            self.registered.insert(registration.name().to_string(), filter);
            Ok(())
        }
    }

    #[test]
    fn test_register_twice_keeps_one_filter() {
        let mut registry = CountingRegistry::default();
        let registration = FilterRegistration::lfs(["*.psd"]).unwrap();

        let first = FilterRegistrar::register(&mut registry, &registration, || 1).unwrap();
        let second = FilterRegistrar::register(&mut registry, &registration, || 2).unwrap();

        assert_eq!(first, RegistrationOutcome::Registered);
        assert_eq!(second, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(registry.registered.len(), 1);
        assert_eq!(registry.registered["lfs"], 1);
    }

    #[test]
    fn test_filter_not_built_when_already_registered() {
        let mut registry = CountingRegistry::default();
        let registration = FilterRegistration::lfs(["*.psd"]).unwrap();
        FilterRegistrar::register(&mut registry, &registration, || 1).unwrap();

        let mut built = false;
        FilterRegistrar::register(&mut registry, &registration, || {
            built = true;
            2
        })
        .unwrap();

        assert!(!built);
    }

    #[test]
    fn test_invalid_registration() {
        assert!(FilterRegistration::new("", ["*.psd"]).is_err());
        assert!(FilterRegistration::new("my filter", ["*.psd"]).is_err());
        assert!(FilterRegistration::lfs(["*.p sd"]).is_err());
        assert!(FilterRegistration::lfs(["[unclosed"]).is_err());
    }

    #[test]
    fn test_basename_patterns_match_anywhere() {
        let registration = FilterRegistration::lfs(["*.psd", "*.bin"]).unwrap();
        assert!(registration.matches("a.bin"));
        assert!(registration.matches("Assets/Art/hero.psd"));
        assert!(registration.matches("Assets\\Art\\hero.psd"));
        assert!(!registration.matches("Assets/Scripts/hero.cs"));
    }

    #[test]
    fn test_path_patterns_are_anchored() {
        let registration = FilterRegistration::lfs(["Assets/**/*.fbx", "/Audio/*.wav"]).unwrap();
        assert!(registration.matches("Assets/Models/Characters/hero.fbx"));
        assert!(registration.matches("Audio/theme.wav"));
        assert!(!registration.matches("Other/Assets/hero.fbx"));
        assert!(!registration.matches("Audio/Music/theme.wav"));
    }
}
