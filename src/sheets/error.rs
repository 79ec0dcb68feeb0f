//! Google Sheets API error types.
//!
//! Every failure is classified as transient (retriable) or permanent. One
//! permanent case is singled out: reading a range on a worksheet that does not
//! exist yet, which the interpreter answers by creating the worksheet.

use std::fmt;
use thiserror::Error;

use crate::retry::{Classified, ErrorKind};

/// A Google Sheets API error with categorization for retry decisions.
#[derive(Debug, Error)]
pub struct SheetsApiError {
    /// Transient or permanent.
    pub kind: ErrorKind,

    /// The HTTP status code, if the API answered.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying transport error, if any.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for SheetsApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "Sheets API error (HTTP {}): {}", code, self.message),
            None => write!(f, "Sheets API error: {}", self.message),
        }
    }
}

impl Classified for SheetsApiError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl SheetsApiError {
    /// Categorizes a transport-level reqwest error.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        Self {
            kind: ErrorKind::from_reqwest(&err),
            status_code: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Categorizes a non-success HTTP response by status code.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::from_status(status),
            status_code: Some(status),
            message: body.into(),
            source: None,
        }
    }

    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// True when the API rejected a range because its worksheet is missing.
    ///
    /// Sheets answers `400 INVALID_ARGUMENT` with "Unable to parse range" for
    /// ranges that name a worksheet that does not exist.
    pub fn is_missing_range(&self) -> bool {
        self.status_code == Some(400) && self.message.contains("Unable to parse range")
    }

    /// True when an `addSheet` request lost a race with another creator.
    pub fn is_already_exists(&self) -> bool {
        self.status_code == Some(400) && self.message.contains("already exists")
    }
}
