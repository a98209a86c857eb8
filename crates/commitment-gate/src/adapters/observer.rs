//! Gate Observer Adapters
//!
//! `RecordingObserver` keeps every event for inspection; `TracingObserver`
//! forwards events to the log.

use crate::events::GateEvent;
use crate::ports::outbound::GateObserver;
use parking_lot::Mutex;
use tracing::info;

/// Records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<GateEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<GateEvent> {
        self.events.lock().clone()
    }
}

impl GateObserver for RecordingObserver {
    fn on_event(&self, event: &GateEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Logs every event at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl GateObserver for TracingObserver {
    fn on_event(&self, event: &GateEvent) {
        info!(event = event.name(), ?event, "Gate event");
    }
}
