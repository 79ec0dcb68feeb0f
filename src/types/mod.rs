//! Core domain types for the broker queue.

pub mod broker;
pub mod roster;

pub use broker::{Broker, BrokerId, StoredPosition};
pub use roster::Roster;
