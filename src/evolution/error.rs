//! Evolution API error types.
//!
//! Only transport failures surface as errors. An HTTP response with a
//! non-2xx status is a `DeliveryReceipt` with `accepted = false`.

use std::fmt;
use thiserror::Error;

use crate::retry::{Classified, ErrorKind};

/// A transport-level failure talking to the Evolution API.
#[derive(Debug, Error)]
pub struct EvolutionApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for EvolutionApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Evolution API error: {}", self.message)
    }
}

impl Classified for EvolutionApiError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl EvolutionApiError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        Self {
            kind: ErrorKind::from_reqwest(&err),
            message,
            source: Some(err),
        }
    }

    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Permanent,
            message: message.into(),
            source: None,
        }
    }
}
