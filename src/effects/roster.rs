//! Roster store effect types.
//!
//! These describe reads and writes against the external roster store (the
//! spreadsheet) as data. The sheets interpreter executes them; tests use an
//! in-memory interpreter.

use serde::{Deserialize, Serialize};

use crate::types::{Roster, StoredPosition};

/// An operation against the roster store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RosterEffect {
    /// Read every broker, in rotation order.
    ListBrokers,

    /// Read the persisted queue position.
    GetStoredPosition,

    /// Overwrite the persisted queue position.
    SetStoredPosition { position: StoredPosition },
}

/// Response from a roster effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RosterResponse {
    /// Response to `ListBrokers`.
    Brokers(Roster),

    /// Response to `GetStoredPosition`.
    Position(StoredPosition),

    /// Response to `SetStoredPosition`.
    PositionStored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_serializes_with_type_tag() {
        let effect = RosterEffect::SetStoredPosition {
            position: StoredPosition(4),
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "set_stored_position", "position": 4})
        );
    }
}
