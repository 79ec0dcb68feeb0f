//! Service-level errors.

use thiserror::Error;

use crate::queue::QueueError;

/// Boxed backend error, preserved as the `source` of a service error.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by queue service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The roster has no brokers.
    #[error("no brokers found in the roster")]
    EmptyRoster,

    /// The roster store failed or answered with something unusable.
    #[error("roster source unavailable while trying to {operation}: {source}")]
    RosterSourceUnavailable {
        operation: &'static str,
        #[source]
        source: BackendError,
    },

    /// A notification operation was requested but the messaging backend has
    /// no endpoint or credentials.
    #[error("messaging backend is not configured (set EVOLUTION_API_URL and EVOLUTION_API_KEY)")]
    NotifierUnconfigured,
}

impl ServiceError {
    pub(crate) fn roster_source(
        operation: &'static str,
        source: impl Into<BackendError>,
    ) -> Self {
        ServiceError::RosterSourceUnavailable {
            operation,
            source: source.into(),
        }
    }
}

impl From<QueueError> for ServiceError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::EmptyRoster => ServiceError::EmptyRoster,
        }
    }
}

/// An interpreter answered an effect with the wrong response variant.
#[derive(Debug, Error)]
#[error("unexpected response to {effect}: {response}")]
pub struct UnexpectedResponse {
    pub effect: &'static str,
    pub response: String,
}
