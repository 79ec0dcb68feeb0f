//! Notification endpoints.

use axum::Json;
use axum::extract::State;

use super::AppState;
use super::response::NotificationsResponse;
use crate::effects::{NotifyInterpreter, RosterInterpreter};
use crate::service::{NotifierStatus, ServiceError};

/// `POST /notifications`: sends every broker their place without advancing.
pub async fn send_notifications_handler<R, N>(
    State(state): State<AppState<R, N>>,
) -> Result<Json<NotificationsResponse>, ServiceError>
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    let outcome = state.service().send_notifications().await?;
    Ok(Json(outcome.into()))
}

/// `GET /notifications/status`
pub async fn notification_status_handler<R, N>(
    State(state): State<AppState<R, N>>,
) -> Json<NotifierStatus>
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    Json(state.service().notification_config_status().await)
}
