//! Messaging effect types.

use serde::{Deserialize, Serialize};

/// An operation against the messaging backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyEffect {
    /// Send a text message to a phone number.
    SendText { number: String, text: String },

    /// Check whether the messaging endpoint answers at all.
    Probe,
}

/// What the messaging backend said about a send.
///
/// A non-2xx answer is still a response, not an interpreter error: the
/// backend was reached and rejected the message. Interpreter errors are
/// reserved for transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub status_code: u16,
    pub accepted: bool,
    /// Response body for rejected sends.
    pub detail: Option<String>,
}

impl DeliveryReceipt {
    pub fn accepted(status_code: u16) -> Self {
        DeliveryReceipt {
            status_code,
            accepted: true,
            detail: None,
        }
    }

    pub fn rejected(status_code: u16, detail: impl Into<String>) -> Self {
        DeliveryReceipt {
            status_code,
            accepted: false,
            detail: Some(detail.into()),
        }
    }
}

/// Response from a messaging effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NotifyResponse {
    /// Response to `SendText`.
    Delivery(DeliveryReceipt),

    /// Response to `Probe`.
    Reachable(bool),
}
