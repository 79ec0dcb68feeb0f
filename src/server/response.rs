//! JSON bodies returned by the queue and notification endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::notify::{NotificationReport, NotificationResult, NotificationStats};
use crate::service::{
    AdvanceOutcome, NotificationOutcome, PositionChange, QueueView, ResetOutcome, SyncOutcome,
};
use crate::types::{Broker, StoredPosition};

/// A broker with its 1-based place in line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerEntry {
    pub name: String,
    pub contact_email: String,
    pub phone_number: String,
    pub place: usize,
}

impl BrokerEntry {
    pub fn new(broker: &Broker, place: usize) -> Self {
        BrokerEntry {
            name: broker.name.clone(),
            contact_email: broker.contact_email.clone(),
            phone_number: broker.phone_number.clone(),
            place,
        }
    }
}

/// Brokers after the current one, numbered from place 2.
fn upcoming_entries(upcoming: &[Broker]) -> Vec<BrokerEntry> {
    upcoming
        .iter()
        .enumerate()
        .map(|(i, broker)| BrokerEntry::new(broker, i + 2))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub current_broker: BrokerEntry,
    pub upcoming_brokers: Vec<BrokerEntry>,
    pub roster_changed: bool,
    pub roster_fingerprint: String,
    pub stored_position: StoredPosition,
    pub current_index: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<QueueView> for QueueResponse {
    fn from(view: QueueView) -> Self {
        QueueResponse {
            current_broker: BrokerEntry::new(&view.current, 1),
            upcoming_brokers: upcoming_entries(&view.upcoming),
            roster_changed: view.changed,
            roster_fingerprint: view.fingerprint,
            stored_position: view.stored_position,
            current_index: view.current_index,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    /// The outgoing broker, now last in line.
    pub previous_broker: BrokerEntry,
    pub current_broker: BrokerEntry,
    pub upcoming_brokers: Vec<BrokerEntry>,
    pub roster_changed: bool,
    pub position: PositionChange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationReport>,
    pub timestamp: DateTime<Utc>,
}

impl From<AdvanceOutcome> for AdvanceResponse {
    fn from(outcome: AdvanceOutcome) -> Self {
        AdvanceResponse {
            previous_broker: BrokerEntry::new(&outcome.previous, outcome.upcoming.len() + 1),
            current_broker: BrokerEntry::new(&outcome.current, 1),
            upcoming_brokers: upcoming_entries(&outcome.upcoming),
            roster_changed: outcome.changed,
            position: outcome.position,
            persist_error: outcome.persist_error,
            notifications: outcome.notifications,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub current_broker: BrokerEntry,
    pub upcoming_brokers: Vec<BrokerEntry>,
    pub timestamp: DateTime<Utc>,
}

impl From<ResetOutcome> for ResetResponse {
    fn from(outcome: ResetOutcome) -> Self {
        ResetResponse {
            current_broker: BrokerEntry::new(&outcome.current, 1),
            upcoming_brokers: upcoming_entries(&outcome.upcoming),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub stored_position: StoredPosition,
    pub corrected_position: usize,
    pub changed: bool,
    pub persisted: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        SyncResponse {
            stored_position: outcome.stored_position,
            corrected_position: outcome.corrected_position,
            changed: outcome.changed,
            persisted: outcome.persisted,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub message: String,
    pub target_broker: String,
    pub stats: NotificationStats,
    pub results: Vec<NotificationResult>,
    pub timestamp: DateTime<Utc>,
}

impl From<NotificationOutcome> for NotificationsResponse {
    fn from(outcome: NotificationOutcome) -> Self {
        NotificationsResponse {
            message: format!(
                "notifications processed for {} brokers",
                outcome.report.stats.total
            ),
            target_broker: outcome.target.name,
            stats: outcome.report.stats,
            results: outcome.report.results,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::broker;

    #[test]
    fn upcoming_places_start_at_two() {
        let entries = upcoming_entries(&[broker("B"), broker("C")]);
        let places: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.place)).collect();
        assert_eq!(places, vec![("B", 2), ("C", 3)]);
    }

    #[test]
    fn previous_broker_is_last_in_line() {
        let outcome = AdvanceOutcome {
            previous: broker("A"),
            current: broker("B"),
            upcoming: vec![broker("C"), broker("A")],
            changed: false,
            position: PositionChange { from: 0, to: 1 },
            persist_error: None,
            notifications: None,
        };

        let response = AdvanceResponse::from(outcome);
        assert_eq!(response.previous_broker.place, 3);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("persist_error").is_none());
        assert!(json.get("notifications").is_none());
        assert_eq!(json["position"], serde_json::json!({"from": 0, "to": 1}));
    }
}
