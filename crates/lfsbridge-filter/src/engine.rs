// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Interfaces between the filter and the host version-control engine
//!
//! The engine calls a [`ContentFilter`] for every path that matches the
//! filter's patterns, and keeps filters in a [`FilterRegistry`] keyed by name.

use crate::driver::StageOutcome;
use crate::error::{FilterError, FilterResult};
use crate::mode::FilterMode;
use crate::registrar::FilterRegistration;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Lifecycle callbacks the engine invokes per matching file.
///
/// Implementations must not panic or fail across these calls; every outcome,
/// including failures, is reported as a [`StageOutcome`].
pub trait ContentFilter: Send + Sync {
    /// Starts an invocation for `path`.
    fn create(&self, path: &str, root: &Path, mode: FilterMode) -> StageOutcome;

    /// Feeds working-tree bytes for `path` into the invocation.
    fn clean(&self, path: &str, root: &Path, input: &mut dyn Read, output: &mut dyn Write)
        -> StageOutcome;

    /// Feeds object-store bytes for `path` into the invocation.
    fn smudge(
        &self,
        path: &str,
        root: &Path,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> StageOutcome;

    /// Finishes the invocation, writing the transformed bytes to `output`.
    fn complete(&self, path: &str, root: &Path, output: &mut dyn Write) -> StageOutcome;
}

/// Named filter registry exposed by the engine.
pub trait FilterRegistry {
    /// What the registry stores for each name
    type Filter;

    /// Returns true if a filter called `name` is already registered
    fn contains(&self, name: &str) -> bool;

    /// Registers `filter` under the registration's name and patterns.
    ///
    /// # Errors
    ///
    /// Implementations fail when the name is taken or the backing store
    /// cannot be updated.
    fn register(&mut self, registration: &FilterRegistration, filter: Self::Filter)
        -> FilterResult<()>;
}

struct RegisteredFilter {
    registration: FilterRegistration,
    filter: Arc<dyn ContentFilter>,
}

/// In-process registry for hosts that dispatch filters themselves.
#[derive(Default)]
pub struct InMemoryRegistry {
    filters: BTreeMap<String, RegisteredFilter>,
}

impl InMemoryRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true when no filter is registered
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Registered filter names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.filters.keys().map(String::as_str).collect()
    }

    /// Filter registered under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn ContentFilter>> {
        self.filters.get(name).map(|entry| Arc::clone(&entry.filter))
    }

    /// Registration stored under `name`
    pub fn registration(&self, name: &str) -> Option<&FilterRegistration> {
        self.filters.get(name).map(|entry| &entry.registration)
    }

    /// First filter (by name) whose patterns match `path`
    pub fn filter_for(&self, path: &str) -> Option<(&FilterRegistration, Arc<dyn ContentFilter>)> {
        self.filters
            .values()
            .find(|entry| entry.registration.matches(path))
            .map(|entry| (&entry.registration, Arc::clone(&entry.filter)))
    }
}

impl FilterRegistry for InMemoryRegistry {
    type Filter = Arc<dyn ContentFilter>;

    fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    fn register(
        &mut self,
        registration: &FilterRegistration,
        filter: Self::Filter,
    ) -> FilterResult<()> {
        if self.contains(registration.name()) {
            return Err(FilterError::Registration(format!(
                "filter '{}' is already registered",
                registration.name()
            )));
        }

        self.filters.insert(
            registration.name().to_string(),
            RegisteredFilter {
                registration: registration.clone(),
                filter,
            },
        );
        Ok(())
    }
}

impl fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.filters
                    .iter()
                    .map(|(name, entry)| (name, entry.registration.patterns().collect::<Vec<_>>())),
            )
            .finish()
    }
}
