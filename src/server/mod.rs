//! HTTP server for the broker queue.
//!
//! Handlers are thin: each one calls a single `QueueService` operation and
//! shapes the result as JSON. Service errors map to status codes in `error`.
//!
//! # Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /health` - Liveness plus configuration summary (no backend calls)
//! - `GET /ping` - Keep-alive with timestamp
//! - `GET /queue` - Current broker and upcoming brokers
//! - `POST /queue/advance?notify=bool` - Advance the queue
//! - `POST /queue/reset` - Reset the queue to the first broker
//! - `POST /queue/sync` - Write back a drifted position
//! - `POST /notifications` - Send every broker their place
//! - `GET /notifications/status` - Messaging configuration and reachability

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::EnvStatus;
use crate::effects::{NotifyInterpreter, RosterInterpreter};
use crate::evolution::EvolutionClient;
use crate::service::QueueService;
use crate::sheets::SheetsClient;

mod error;
pub mod health;
pub mod notifications;
pub mod queue;
pub mod response;

pub use health::{health_handler, ping_handler, root_handler};
pub use notifications::{notification_status_handler, send_notifications_handler};
pub use queue::{advance_handler, queue_handler, reset_handler, sync_handler};

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. The type
/// parameters default to the production backends; tests substitute in-memory
/// interpreters.
pub struct AppState<R = SheetsClient, N = EvolutionClient> {
    inner: Arc<AppStateInner<R, N>>,
}

struct AppStateInner<R, N> {
    service: QueueService<R, N>,

    /// Which backend variables were configured at startup.
    env_status: EnvStatus,
}

impl<R, N> Clone for AppState<R, N> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, N> AppState<R, N>
where
    R: RosterInterpreter,
    N: NotifyInterpreter,
{
    pub fn new(service: QueueService<R, N>, env_status: EnvStatus) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                service,
                env_status,
            }),
        }
    }

    pub fn service(&self) -> &QueueService<R, N> {
        &self.inner.service
    }

    pub fn env_status(&self) -> EnvStatus {
        self.inner.env_status
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<R, N>(app_state: AppState<R, N>) -> axum::Router
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<R, N>))
        .route("/ping", get(ping_handler))
        .route("/queue", get(queue_handler::<R, N>))
        .route("/queue/advance", post(advance_handler::<R, N>))
        .route("/queue/reset", post(reset_handler::<R, N>))
        .route("/queue/sync", post(sync_handler::<R, N>))
        .route("/notifications", post(send_notifications_handler::<R, N>))
        .route(
            "/notifications/status",
            get(notification_status_handler::<R, N>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
