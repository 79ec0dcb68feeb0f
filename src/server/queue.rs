//! Queue endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use super::AppState;
use super::response::{AdvanceResponse, QueueResponse, ResetResponse, SyncResponse};
use crate::effects::{NotifyInterpreter, RosterInterpreter};
use crate::service::ServiceError;

/// `GET /queue`: the current broker and who follows. Never writes.
pub async fn queue_handler<R, N>(
    State(state): State<AppState<R, N>>,
) -> Result<Json<QueueResponse>, ServiceError>
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    let view = state.service().get_current().await?;
    Ok(Json(view.into()))
}

#[derive(Debug, Default, Deserialize)]
pub struct AdvanceParams {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub notify: bool,
}

/// Reads a query flag the way form-style clients send them: `true`/`false`,
/// `1`/`0`, `yes`/`no`, `on`/`off` and their one-letter forms, in any case.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| {
        de::Error::invalid_value(de::Unexpected::Str(&raw), &"a boolean such as true, 1 or yes")
    })
}

/// `POST /queue/advance?notify=bool`: hands the turn to the next broker.
///
/// With `notify` set (`true`, `1`, `yes` or `on`) the call also sends every
/// broker their new place, which takes several seconds per broker. Any other
/// value is rejected with 400 before anything is written.
pub async fn advance_handler<R, N>(
    State(state): State<AppState<R, N>>,
    Query(params): Query<AdvanceParams>,
) -> Result<Json<AdvanceResponse>, ServiceError>
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    let outcome = state.service().advance(params.notify).await?;
    Ok(Json(outcome.into()))
}

/// `POST /queue/reset`: puts the first roster row back at the front.
pub async fn reset_handler<R, N>(
    State(state): State<AppState<R, N>>,
) -> Result<Json<ResetResponse>, ServiceError>
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    let outcome = state.service().reset().await?;
    Ok(Json(outcome.into()))
}

/// `POST /queue/sync`: writes back the reconciled position if it drifted.
pub async fn sync_handler<R, N>(
    State(state): State<AppState<R, N>>,
) -> Result<Json<SyncResponse>, ServiceError>
where
    R: RosterInterpreter + 'static,
    N: NotifyInterpreter + 'static,
{
    let outcome = state.service().sync_position().await?;
    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_spellings() {
        for raw in ["true", "TRUE", "1", "yes", "on", "t", "Y"] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "no", "off", "f", "N"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        for raw in ["", "maybe", "2", "truthy"] {
            assert_eq!(parse_flag(raw), None, "{raw}");
        }
    }
}
