// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Capture of `tracing` events emitted while a closure runs.
//!
//! The capturing subscriber is installed for the current thread only, so
//! tests running in parallel do not see each other's diagnostics.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One recorded event
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Event level
    pub level: Level,
    /// Event target (module path)
    pub target: String,
    /// The `message` field, empty if the event had none
    pub message: String,
}

/// Layer that records every event it sees.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl DiagnosticCapture {
    /// All recorded events in emission order
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events at exactly `level`
    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }

    /// Number of WARN and ERROR events
    pub fn problem_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| event.level <= Level::WARN)
            .count()
    }

    /// Returns true if some event's message contains `needle`
    pub fn contains_message(&self, needle: &str) -> bool {
        self.events().iter().any(|event| event.message.contains(needle))
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                message: visitor.message,
            });
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// Runs `f` with a capturing subscriber installed on this thread and returns
/// its result together with everything it logged.
///
/// # Example
/// ```ignore
/// let (outcome, diagnostics) = capture_diagnostics(|| driver.clean(path, root, &mut input, &mut output));
/// assert_eq!(diagnostics.problem_count(), 1);
/// ```
pub fn capture_diagnostics<T>(f: impl FnOnce() -> T) -> (T, DiagnosticCapture) {
    let capture = DiagnosticCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_levels_and_messages() {
        let ((), capture) = capture_diagnostics(|| {
            tracing::debug!("quiet");
            tracing::warn!(path = "a.bin", "something odd");
            tracing::error!("broken");
        });

        assert_eq!(capture.events().len(), 3);
        assert_eq!(capture.problem_count(), 2);
        assert_eq!(capture.at_level(Level::ERROR)[0].message, "broken");
        assert!(capture.contains_message("something odd"));
    }

    #[test]
    fn test_returns_closure_result() {
        let (value, capture) = capture_diagnostics(|| 42);
        assert_eq!(value, 42);
        assert!(capture.events().is_empty());
    }
}
