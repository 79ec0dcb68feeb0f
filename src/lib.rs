//! Broker Queue - a round-robin queue of real-estate brokers.
//!
//! The roster and the queue position live in a Google Sheets spreadsheet that
//! people edit by hand. Every request re-reads both and reconciles the stored
//! position against the current roster. Brokers can be told their place in
//! line over WhatsApp through the Evolution API.

pub mod config;
pub mod effects;
pub mod evolution;
pub mod notify;
pub mod queue;
pub mod retry;
pub mod server;
pub mod service;
pub mod sheets;
pub mod types;

#[cfg(test)]
pub mod test_utils;
