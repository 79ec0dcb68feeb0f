//! Shared test utilities: roster builders, arbitrary generators for
//! property-based testing, and in-memory interpreters.

use std::collections::HashSet;
use std::sync::Mutex;

use proptest::prelude::*;
use thiserror::Error;

use crate::effects::{
    DeliveryReceipt, NotifyEffect, NotifyInterpreter, NotifyResponse, RosterEffect,
    RosterInterpreter, RosterResponse,
};
use crate::types::{Broker, Roster, StoredPosition};

/// A broker whose email and phone are derived from `name`, so two calls with
/// the same name produce the same identity.
pub fn broker(name: &str) -> Broker {
    Broker::new(
        name,
        format!("{}@example.com", name.to_lowercase()),
        format!("55119{name}"),
    )
}

pub fn roster_of(names: &[&str]) -> Roster {
    names.iter().map(|name| broker(name)).collect()
}

pub fn names<'a>(brokers: impl IntoIterator<Item = &'a Broker>) -> Vec<String> {
    brokers.into_iter().map(|b| b.name.clone()).collect()
}

pub fn arb_broker() -> impl Strategy<Value = Broker> {
    ("[A-Z][a-z]{1,10}", "[0-9]{8}")
        .prop_map(|(name, phone)| Broker::new(&name, format!("{name}@example.com"), phone))
}

/// Rosters whose brokers all have distinct identities.
pub fn arb_roster(size: std::ops::Range<usize>) -> impl Strategy<Value = Roster> {
    prop::collection::hash_set("[0-9]{8}", size).prop_map(|phones: HashSet<String>| {
        phones
            .into_iter()
            .enumerate()
            .map(|(i, phone)| Broker::new(format!("Broker{i}"), format!("b{i}@example.com"), phone))
            .collect()
    })
}

// ─── In-memory interpreters ─────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("backend unavailable: {0}")]
pub struct MockBackendError(pub String);

#[derive(Debug)]
struct RosterStore {
    roster: Roster,
    position: StoredPosition,
    writes: Vec<StoredPosition>,
    fail_reads: bool,
    fail_writes: bool,
}

/// A roster store held in memory, with switchable failures.
#[derive(Debug)]
pub struct InMemoryRoster {
    store: Mutex<RosterStore>,
}

impl InMemoryRoster {
    pub fn new(roster: Roster, position: i64) -> Self {
        InMemoryRoster {
            store: Mutex::new(RosterStore {
                roster,
                position: StoredPosition(position),
                writes: Vec::new(),
                fail_reads: false,
                fail_writes: false,
            }),
        }
    }

    pub fn failing_reads(self) -> Self {
        self.store.lock().unwrap().fail_reads = true;
        self
    }

    pub fn failing_writes(self) -> Self {
        self.store.lock().unwrap().fail_writes = true;
        self
    }

    pub fn set_roster(&self, roster: Roster) {
        self.store.lock().unwrap().roster = roster;
    }

    pub fn position(&self) -> StoredPosition {
        self.store.lock().unwrap().position
    }

    /// Every position written, in order.
    pub fn writes(&self) -> Vec<StoredPosition> {
        self.store.lock().unwrap().writes.clone()
    }
}

impl RosterInterpreter for InMemoryRoster {
    type Error = MockBackendError;

    async fn interpret(&self, effect: RosterEffect) -> Result<RosterResponse, Self::Error> {
        let mut store = self.store.lock().unwrap();
        match effect {
            RosterEffect::ListBrokers | RosterEffect::GetStoredPosition if store.fail_reads => {
                Err(MockBackendError("read refused".to_string()))
            }
            RosterEffect::ListBrokers => Ok(RosterResponse::Brokers(store.roster.clone())),
            RosterEffect::GetStoredPosition => Ok(RosterResponse::Position(store.position)),
            RosterEffect::SetStoredPosition { .. } if store.fail_writes => {
                Err(MockBackendError("write refused".to_string()))
            }
            RosterEffect::SetStoredPosition { position } => {
                store.position = position;
                store.writes.push(position);
                Ok(RosterResponse::PositionStored)
            }
        }
    }
}

/// A messaging backend that records every send and fails on request.
#[derive(Debug, Default)]
pub struct ScriptedNotifier {
    failing: HashSet<String>,
    rejecting: HashSet<String>,
    unreachable: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to `phone` fail with a transport error.
    pub fn failing_for(mut self, phone: &str) -> Self {
        self.failing.insert(phone.to_string());
        self
    }

    /// Sends to `phone` get a 400 response.
    pub fn rejecting_for(mut self, phone: &str) -> Self {
        self.rejecting.insert(phone.to_string());
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// `(number, text)` of every attempted send, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotifyInterpreter for ScriptedNotifier {
    type Error = MockBackendError;

    async fn interpret(&self, effect: NotifyEffect) -> Result<NotifyResponse, Self::Error> {
        match effect {
            NotifyEffect::SendText { number, text } => {
                self.sent.lock().unwrap().push((number.clone(), text));
                if self.failing.contains(&number) {
                    Err(MockBackendError(format!("connection reset sending to {number}")))
                } else if self.rejecting.contains(&number) {
                    Ok(NotifyResponse::Delivery(DeliveryReceipt::rejected(
                        400,
                        "invalid number",
                    )))
                } else {
                    Ok(NotifyResponse::Delivery(DeliveryReceipt::accepted(201)))
                }
            }
            NotifyEffect::Probe => Ok(NotifyResponse::Reachable(!self.unreachable)),
        }
    }
}
