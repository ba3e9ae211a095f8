//! Observers that receive sweep events

use broom_domain::{EventLevel, SweepEvent, SweepObserver};
use std::sync::{Mutex, PoisonError};

/// Forwards every event to `tracing` at the event's level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SweepObserver for TracingObserver {
    fn observe(&self, event: &SweepEvent) {
        match event.level() {
            EventLevel::Debug => tracing::debug!("{}", event),
            EventLevel::Info => tracing::info!("{}", event),
            EventLevel::Warn => tracing::warn!("{}", event),
            EventLevel::Error => tracing::error!("{}", event),
        }
    }
}

/// Keeps every event in memory, in order
///
/// Useful for tests and for callers that want to inspect a run afterwards.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SweepEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<SweepEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rendered messages of all recorded events
    pub fn messages(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }

    /// Recorded events at `level`
    pub fn at_level(&self, level: EventLevel) -> Vec<SweepEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() == level)
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl SweepObserver for RecordingObserver {
    fn observe(&self, event: &SweepEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
