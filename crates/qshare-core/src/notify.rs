//! User-facing status events.
//!
//! The [`Notifier`] stamps each event with a monotonically increasing id and
//! forwards it to a [`StatusSink`]. Ids are owned by the notifier instance, so
//! two notifiers never share a counter.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

/// Destination for status events (terminal, UI, test recorder).
pub trait StatusSink: Send + Sync {
    fn emit(&self, event: &StatusEvent);
}

pub struct Notifier {
    next_id: AtomicU64,
    sink: Box<dyn StatusSink>,
}

impl Notifier {
    pub fn new(sink: impl StatusSink + 'static) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            sink: Box::new(sink),
        }
    }

    /// Emits an event and returns its id.
    pub fn push(&self, severity: Severity, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let event = StatusEvent {
            id,
            severity,
            message: message.into(),
        };
        self.sink.emit(&event);
        id
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(Severity::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(Severity::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(Severity::Error, message)
    }
}

/// Prints `[severity] message` lines to stderr and mirrors them into the log.
///
/// The log copy is always at `info`, so the stderr logging fallback (`warn`)
/// does not print a status line twice.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn emit(&self, event: &StatusEvent) {
        tracing::info!(id = event.id, severity = %event.severity, "{}", event.message);
        eprintln!("[{}] {}", event.severity, event.message);
    }
}

/// Keeps every event in memory; cheap to clone and share with a notifier.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<StatusEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.events()
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }
}

impl StatusSink for RecordingSink {
    fn emit(&self, event: &StatusEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
