//! Effects-as-data for the roster store and the messaging backend.
//!
//! The queue service never talks to Google Sheets or the Evolution API
//! directly. It describes each external operation as an effect value and
//! hands it to an interpreter. This keeps the service testable with in-memory
//! interpreters and gives every external call a loggable shape.

pub mod interpreter;
pub mod notify;
pub mod roster;

pub use interpreter::{NotifyInterpreter, RosterInterpreter};
pub use notify::{DeliveryReceipt, NotifyEffect, NotifyResponse};
pub use roster::{RosterEffect, RosterResponse};
