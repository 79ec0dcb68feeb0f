//! Liveness endpoints.
//!
//! None of these call a backend, so they answer even when the spreadsheet or
//! the messaging API is down.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;
use crate::config::EnvStatus;
use crate::effects::{NotifyInterpreter, RosterInterpreter};

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: &'static str,
    pub version: &'static str,
}

/// Service banner for `GET /`.
pub async fn root_handler() -> Json<Banner> {
    Json(Banner {
        message: "Broker queue API running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub environment: EnvStatus,
    pub notifier_configured: bool,
}

/// Health check handler.
///
/// Reports which backend variables are configured. Makes no backend calls,
/// so it does not report the queue position either: read that from
/// `GET /queue`, or `POST /queue/sync` to also repair a drifted position.
/// Use `GET /notifications/status` to probe the messaging backend.
pub async fn health_handler<R, N>(State(state): State<AppState<R, N>>) -> Json<HealthResponse>
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        environment: state.env_status(),
        notifier_configured: state.service().is_notifier_configured(),
    })
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Keep-alive for hosts that idle out quiet services.
pub async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_reports_ok() {
        let Json(body) = ping_handler().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn root_names_the_service() {
        let Json(body) = root_handler().await;
        assert!(body.message.contains("Broker queue"));
    }
}
