//! Results of queue service operations.

use serde::Serialize;

use crate::notify::NotificationReport;
use crate::types::{Broker, StoredPosition};

/// The queue as it stands, without advancing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueView {
    pub current: Broker,
    pub upcoming: Vec<Broker>,
    /// True when the stored position had to be remapped for this roster.
    pub changed: bool,
    pub fingerprint: String,
    pub stored_position: StoredPosition,
    pub current_index: usize,
}

/// Index movement of an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionChange {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceOutcome {
    /// The broker who was current before the advance.
    pub previous: Broker,
    pub current: Broker,
    pub upcoming: Vec<Broker>,
    pub changed: bool,
    pub position: PositionChange,
    /// Set when the new position could not be written. The advance is still
    /// reported, but the stored position is stale until the next write.
    pub persist_error: Option<String>,
    /// Present only when notifications were requested.
    pub notifications: Option<NotificationReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    pub current: Broker,
    pub upcoming: Vec<Broker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationOutcome {
    /// The current broker at the time of the broadcast.
    pub target: Broker,
    pub report: NotificationReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotifierStatus {
    pub configured: bool,
    /// `None` when unconfigured, since there is nothing to probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_reachable: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub stored_position: StoredPosition,
    pub corrected_position: usize,
    pub changed: bool,
    /// True when the corrected position was written back.
    pub persisted: bool,
}
