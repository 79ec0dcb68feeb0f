//! Notification fan-out.
//!
//! Sends the queue status to every broker in line, sequentially, with a
//! randomized pause between sends. Individual failures are collected into the
//! report and never abort the batch.

mod broadcast;
mod message;
mod pacing;

pub use broadcast::{NotificationReport, NotificationResult, NotificationStats, broadcast};
pub use message::{DEFAULT_SIGNATURE, MessageTemplate};
pub use pacing::SendPacing;
