//! Observation hook for the agent loop.

use sakura_types::event::AgentEvent;

/// Receives [`AgentEvent`]s while a request is processed.
///
/// Called synchronously from the loop, so implementations should only
/// print or record.
pub trait AgentObserver: Send + Sync {
    fn on_event(&self, event: &AgentEvent);
}

/// Ignores every event.
pub struct NullObserver;

impl AgentObserver for NullObserver {
    fn on_event(&self, _event: &AgentEvent) {}
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<AgentEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AgentObserver for RecordingObserver {
    fn on_event(&self, event: &AgentEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
