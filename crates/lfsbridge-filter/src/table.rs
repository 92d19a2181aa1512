// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Path-keyed table of in-flight invocations
//!
//! The table lock covers insert, lookup and remove only. Byte copying runs
//! under the per-session mutex so distinct paths never wait on each other.

use crate::session::FilterSession;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Session handle shared between the table and the stage working on it
pub type SharedSession = Arc<Mutex<FilterSession>>;

/// Locks a session, recovering it if a previous holder panicked.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, FilterSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of active invocations keyed by file path.
#[derive(Debug, Default)]
pub struct InvocationTable {
    entries: Mutex<HashMap<String, SharedSession>>,
}

impl InvocationTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, SharedSession>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if `path` has an active invocation
    pub fn contains(&self, path: &str) -> bool {
        self.entries().contains_key(path)
    }

    /// Inserts `session` for `path` unless an entry already exists.
    ///
    /// The check and the insert happen under one lock. On conflict the
    /// rejected session is handed back so the caller can dispose of it
    /// outside the lock.
    pub fn try_insert(&self, path: &str, session: SharedSession) -> Result<(), SharedSession> {
        match self.entries().entry(path.to_owned()) {
            Entry::Occupied(_) => Err(session),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    /// Looks up the session for `path`
    pub fn get(&self, path: &str) -> Option<SharedSession> {
        self.entries().get(path).map(Arc::clone)
    }

    /// Removes and returns the session for `path`
    pub fn take(&self, path: &str) -> Option<SharedSession> {
        self.entries().remove(path)
    }

    /// Removes the entry for `path` only if it still refers to `session`.
    pub fn remove_if_same(&self, path: &str, session: &SharedSession) -> bool {
        let mut entries = self.entries();
        match entries.get(path) {
            Some(current) if Arc::ptr_eq(current, session) => {
                entries.remove(path);
                true
            }
            _ => false,
        }
    }

    /// Number of active invocations
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true when nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Sorted list of paths currently in flight
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.entries().keys().cloned().collect();
        paths.sort();
        paths
    }
}
