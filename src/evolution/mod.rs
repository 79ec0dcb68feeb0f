//! Evolution API messaging backend (WhatsApp).
//!
//! Implements the `NotifyInterpreter` trait: text sends and a reachability
//! probe, each bounded by the client's request timeout.

mod client;
mod error;
mod interpreter;

pub use client::EvolutionClient;
pub use error::EvolutionApiError;
