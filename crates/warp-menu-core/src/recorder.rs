//! Event recorders for synthesis outcomes.

use log::{debug, info, warn};
use tokio::sync::broadcast;
use warp_menu_protocol::{EventRecorder, EventSeverity, RecordedEvent};

/// Writes every recorded event to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventRecorder;

impl EventRecorder for LogEventRecorder {
    fn record(&self, event: RecordedEvent) {
        match event.severity {
            EventSeverity::Normal => info!(
                "event recorded (target={}, reason={}, message={})",
                event.target, event.reason, event.message
            ),
            EventSeverity::Warning => warn!(
                "event recorded (target={}, reason={}, message={})",
                event.target, event.reason, event.message
            ),
        }
    }
}

/// Broadcast-backed recorder for in-process subscribers.
#[derive(Clone, Debug)]
pub struct BroadcastEventRecorder {
    sender: broadcast::Sender<RecordedEvent>,
}

impl BroadcastEventRecorder {
    /// Create a recorder with the given channel buffer size.
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        debug!("event recorder initialized (buffer={})", buffer);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordedEvent> {
        self.sender.subscribe()
    }
}

impl EventRecorder for BroadcastEventRecorder {
    /// Events recorded with no subscriber are dropped.
    fn record(&self, event: RecordedEvent) {
        let _ = self.sender.send(event);
    }
}
