//! Audit events recorded after each synthesis pass.

use crate::ResourceRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reason recorded after a successful pass.
pub const REASON_MENU_UPDATED: &str = "WarpMenu";
/// Reason recorded after a failed pass.
pub const REASON_MENU_UPDATE_FAILED: &str = "ErrUpdateWarpMenu";

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EventSeverity {
    Normal,
    Warning,
}

/// An event recorded against a target resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub id: Uuid,
    pub target: ResourceRef,
    pub severity: EventSeverity,
    pub reason: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl RecordedEvent {
    pub fn new(
        target: ResourceRef,
        severity: EventSeverity,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            severity,
            reason: reason.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Sink for audit events.
pub trait EventRecorder: Send + Sync {
    /// Record an event. Recording never fails the caller.
    fn record(&self, event: RecordedEvent);
}
