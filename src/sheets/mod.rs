//! Google Sheets roster store.
//!
//! This module executes roster effects against a spreadsheet through the
//! Sheets REST API (v4). It implements the `RosterInterpreter` trait defined
//! in the effects module.
//!
//! Key features:
//! - Service-account authentication with cached access tokens
//! - Exponential backoff retry for transient failures
//! - Header-driven roster parsing, tolerant of ragged rows
//! - Self-creating `Config` worksheet for the queue position

mod auth;
mod client;
mod error;
mod interpreter;
mod layout;

pub use auth::{SPREADSHEETS_SCOPE, ServiceAccountKey};
pub use client::SheetsClient;
pub use error::SheetsApiError;
pub use interpreter::interpret_roster_effect;
pub use layout::{CONFIG_SHEET, POSITION_CELL, POSITION_LABEL, parse_position, parse_roster};
