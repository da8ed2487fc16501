use parking_lot::Mutex;
use std::sync::Arc;
use warp_menu_protocol::{EventRecorder, RecordedEvent};

/// Event recorder that keeps every event for later inspection.
#[derive(Clone, Default)]
pub struct RecordingEventRecorder {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingEventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Reasons of the recorded events, oldest first.
    pub fn reasons(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|event| event.reason.clone())
            .collect()
    }
}

impl EventRecorder for RecordingEventRecorder {
    fn record(&self, event: RecordedEvent) {
        self.events.lock().push(event);
    }
}
