// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Enablement gate consulted at the top of every filter callback
//!
//! The flag is owned by a collaborator (a settings panel, a config file, a
//! feature flag service). The driver only reads it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Read-only switch deciding whether the driver does anything at all.
pub trait EnablementGate: Send + Sync {
    /// Returns true when the driver should filter content.
    fn is_enabled(&self) -> bool;
}

impl<F> EnablementGate for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_enabled(&self) -> bool {
        self()
    }
}

/// Gate that is always open.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEnabled;

impl EnablementGate for AlwaysEnabled {
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Shared boolean flag toggled by its owner.
///
/// Clones observe the same value.
#[derive(Debug, Clone)]
pub struct FeatureFlag {
    enabled: Arc<AtomicBool>,
}

impl FeatureFlag {
    /// Creates a flag with the given initial value
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Sets the flag. Intended for the owning collaborator, not the driver.
    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

impl Default for FeatureFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EnablementGate for FeatureFlag {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flag_shared_between_clones() {
        let flag = FeatureFlag::new(true);
        let observer = flag.clone();
        assert!(observer.is_enabled());

        flag.set(false);
        assert!(!observer.is_enabled());
    }

    #[test]
    fn test_closure_gate() {
        let gate = || false;
        assert!(!gate.is_enabled());
        assert!(AlwaysEnabled.is_enabled());
    }
}
