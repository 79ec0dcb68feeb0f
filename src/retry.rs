//! Exponential backoff retry for backend API calls.
//!
//! Only transient errors are retried. Permanent errors are returned
//! immediately.
//!
//! - Default: 3 retries with 500ms, 1s, 2s delays
//! - Messaging sends bypass this module: a send that timed out may still
//!   have been delivered, and a retry would message the broker twice.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Whether a backend failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Safe to retry with backoff.
    ///
    /// Examples: HTTP 5xx, HTTP 429, timeouts, connection resets.
    Transient,

    /// Retrying will not help.
    ///
    /// Examples: HTTP 4xx other than 429, bad credentials, malformed data.
    Permanent,
}

impl ErrorKind {
    pub fn is_retriable(&self) -> bool {
        matches!(self, ErrorKind::Transient)
    }

    /// Classifies an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => ErrorKind::Transient,
            500..=599 => ErrorKind::Transient,
            _ => ErrorKind::Permanent,
        }
    }

    /// Classifies a transport-level reqwest error.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16());
        }
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ErrorKind::Transient
        } else {
            ErrorKind::Permanent
        }
    }
}

/// Errors that carry a retry classification.
pub trait Classified {
    fn kind(&self) -> ErrorKind;
}

/// Configuration for exponential backoff retry.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,

    /// Initial delay before the first retry.
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential growth).
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (typically 2.0).
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Default retry configuration for spreadsheet calls.
    ///
    /// - 3 retries with 500ms, 1s, 2s delays
    /// - Total max wait: 3.5 seconds
    pub const DEFAULT: Self = Self {
        max_retries: 3,
        initial_delay: Duration::from_millis(500),
        max_delay: Duration::from_secs(4),
        backoff_multiplier: 2.0,
    };

    pub fn new(
        max_retries: u32,
        initial_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// Computes the delay for the given retry attempt (0-indexed).
    ///
    /// `initial_delay * backoff_multiplier^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        let capped_secs = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped_secs)
    }

    /// Returns an iterator over all retry delays.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|attempt| self.delay_for_attempt(attempt))
    }

    pub fn total_max_wait(&self) -> Duration {
        self.delays().sum()
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Retry policy for controlling retry behavior at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry transient errors with exponential backoff.
    #[default]
    RetryTransient,

    /// Do not retry - return errors immediately.
    NoRetry,
}

/// Result of a retried operation.
#[derive(Debug)]
pub enum RetryResult<T, E> {
    /// The operation succeeded.
    Success(T),

    /// A transient error occurred after exhausting all retries.
    ExhaustedRetries {
        /// The last error encountered.
        last_error: E,
        /// Number of attempts made (including the initial attempt).
        attempts: u32,
    },

    /// A permanent error occurred (not retriable).
    PermanentError(E),
}

impl<T, E> RetryResult<T, E> {
    /// Converts to a Result, treating exhausted retries and permanent errors as Err.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryResult::Success(v) => Ok(v),
            RetryResult::ExhaustedRetries { last_error, .. } => Err(last_error),
            RetryResult::PermanentError(e) => Err(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetryResult::Success(_))
    }
}

/// Executes an async operation with retry logic.
///
/// The operation is retried according to `config` while it returns transient
/// errors. Permanent errors are returned immediately.
pub async fn retry_with_backoff<T, E, F, Fut>(
    config: RetryConfig,
    policy: RetryPolicy,
    mut operation: F,
) -> RetryResult<T, E>
where
    E: Classified + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    let max_attempts = if policy == RetryPolicy::NoRetry {
        1
    } else {
        config.max_retries + 1 // Include initial attempt
    };

    loop {
        match operation().await {
            Ok(value) => return RetryResult::Success(value),
            Err(e) => {
                attempt += 1;

                match e.kind() {
                    ErrorKind::Permanent => return RetryResult::PermanentError(e),
                    ErrorKind::Transient => {
                        if attempt >= max_attempts {
                            return RetryResult::ExhaustedRetries {
                                last_error: e,
                                attempts: attempt,
                            };
                        }

                        let delay = config.delay_for_attempt(attempt - 1);
                        debug!(attempt, ?delay, error = %e, "transient backend error, retrying");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}
