//! Effect interpreter traits.
//!
//! Implementations:
//! - `sheets::SheetsClient` for roster effects (Google Sheets REST API)
//! - `evolution::EvolutionClient` for messaging effects (Evolution API)
//! - in-memory interpreters in `test_utils` for tests
//!
//! # Example (mock for testing)
//!
//! ```ignore
//! struct FixedRoster {
//!     roster: Roster,
//! }
//!
//! impl RosterInterpreter for FixedRoster {
//!     type Error = std::io::Error;
//!
//!     async fn interpret(&self, effect: RosterEffect) -> Result<RosterResponse, Self::Error> {
//!         match effect {
//!             RosterEffect::ListBrokers => Ok(RosterResponse::Brokers(self.roster.clone())),
//!             RosterEffect::GetStoredPosition => Ok(RosterResponse::Position(StoredPosition(0))),
//!             RosterEffect::SetStoredPosition { .. } => Ok(RosterResponse::PositionStored),
//!         }
//!     }
//! }
//! ```

use std::future::Future;

use super::notify::{NotifyEffect, NotifyResponse};
use super::roster::{RosterEffect, RosterResponse};

/// Interprets roster effects against the external roster store.
pub trait RosterInterpreter: Send + Sync {
    /// The error type returned by this interpreter.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a roster effect and return its response.
    fn interpret(
        &self,
        effect: RosterEffect,
    ) -> impl Future<Output = Result<RosterResponse, Self::Error>> + Send;
}

/// Interprets messaging effects against the messaging backend.
pub trait NotifyInterpreter: Send + Sync {
    /// The error type returned by this interpreter.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a messaging effect and return its response.
    fn interpret(
        &self,
        effect: NotifyEffect,
    ) -> impl Future<Output = Result<NotifyResponse, Self::Error>> + Send;
}
