//! Roster effect interpreter backed by Google Sheets.
//!
//! - Transient failures are retried with exponential backoff
//! - A missing `Config` worksheet is created on first use, holding position 0

use tracing::{debug, info, warn};

use crate::effects::{RosterEffect, RosterInterpreter, RosterResponse};
use crate::retry::{RetryConfig, RetryPolicy, retry_with_backoff};
use crate::types::StoredPosition;

use super::client::SheetsClient;
use super::error::SheetsApiError;
use super::layout::{
    CONFIG_SHEET, CONFIG_SHEET_COLUMNS, CONFIG_SHEET_ROWS, POSITION_CELL, POSITION_LABEL_RANGE,
    ROSTER_RANGE, initial_config_values, parse_position, parse_roster, position_values,
};

impl RosterInterpreter for SheetsClient {
    type Error = SheetsApiError;

    async fn interpret(&self, effect: RosterEffect) -> Result<RosterResponse, Self::Error> {
        interpret_roster_effect(
            self,
            effect,
            self.retry_config(),
            RetryPolicy::RetryTransient,
        )
        .await
    }
}

/// Interprets a roster effect against the spreadsheet, with retry.
pub async fn interpret_roster_effect(
    client: &SheetsClient,
    effect: RosterEffect,
    retry_config: RetryConfig,
    retry_policy: RetryPolicy,
) -> Result<RosterResponse, SheetsApiError> {
    retry_with_backoff(retry_config, retry_policy, || {
        execute_effect(client, effect.clone())
    })
    .await
    .into_result()
}

async fn execute_effect(
    client: &SheetsClient,
    effect: RosterEffect,
) -> Result<RosterResponse, SheetsApiError> {
    match effect {
        RosterEffect::ListBrokers => list_brokers(client).await,
        RosterEffect::GetStoredPosition => get_stored_position(client).await,
        RosterEffect::SetStoredPosition { position } => {
            set_stored_position(client, position).await
        }
    }
}

async fn list_brokers(client: &SheetsClient) -> Result<RosterResponse, SheetsApiError> {
    let rows = client.get_values(ROSTER_RANGE).await?;
    let roster = parse_roster(&rows)?;
    debug!(brokers = roster.len(), "read roster from spreadsheet");
    Ok(RosterResponse::Brokers(roster))
}

async fn get_stored_position(client: &SheetsClient) -> Result<RosterResponse, SheetsApiError> {
    match client.get_values(POSITION_CELL).await {
        Ok(rows) => {
            let position = parse_position(&rows)?;
            debug!(%position, "read queue position from spreadsheet");
            Ok(RosterResponse::Position(position))
        }
        Err(e) if e.is_missing_range() => {
            warn!(
                sheet = CONFIG_SHEET,
                "config worksheet missing, creating it at position 0"
            );
            create_config_sheet(client, StoredPosition::START).await?;
            Ok(RosterResponse::Position(StoredPosition::START))
        }
        Err(e) => Err(e),
    }
}

async fn set_stored_position(
    client: &SheetsClient,
    position: StoredPosition,
) -> Result<RosterResponse, SheetsApiError> {
    match client.put_values(POSITION_CELL, position_values(position)).await {
        Ok(()) => {}
        Err(e) if e.is_missing_range() => {
            warn!(sheet = CONFIG_SHEET, "config worksheet missing, creating it");
            create_config_sheet(client, position).await?;
        }
        Err(e) => return Err(e),
    }
    info!(%position, "stored queue position in spreadsheet");
    Ok(RosterResponse::PositionStored)
}

async fn create_config_sheet(
    client: &SheetsClient,
    position: StoredPosition,
) -> Result<(), SheetsApiError> {
    match client
        .add_sheet(CONFIG_SHEET, CONFIG_SHEET_ROWS, CONFIG_SHEET_COLUMNS)
        .await
    {
        Ok(()) => {}
        // Another request created it between our read and this call.
        Err(e) if e.is_already_exists() => {}
        Err(e) => return Err(e),
    }
    client
        .put_values(POSITION_LABEL_RANGE, initial_config_values(position))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use crate::sheets::ServiceAccountKey;

    const TEST_KEY_PEM: &str = include_str!("testdata/service_account_key.pem");

    #[derive(Debug, Clone, PartialEq)]
    enum SheetsCall {
        Get(String),
        Put { range: String, values: Value },
        AddSheet { title: String },
    }

    /// An in-process stand-in for the token endpoint and the Sheets v4 API.
    #[derive(Default)]
    struct FakeSheets {
        config_exists: Mutex<bool>,
        stored_position: Mutex<Option<i64>>,
        /// `addSheet` creates the sheet but reports that it already existed,
        /// as when a concurrent request won the race.
        lose_add_sheet_race: bool,
        /// Every values call answers 403, as for a spreadsheet not shared
        /// with the service account.
        deny_access: bool,
        calls: Mutex<Vec<SheetsCall>>,
    }

    impl FakeSheets {
        fn without_config_sheet() -> Self {
            Self::default()
        }

        fn with_position(position: i64) -> Self {
            Self {
                config_exists: Mutex::new(true),
                stored_position: Mutex::new(Some(position)),
                ..Self::default()
            }
        }

        fn exists(&self) -> bool {
            *self.config_exists.lock().unwrap()
        }

        fn record(&self, call: SheetsCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<SheetsCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn missing_range(range: &str) -> Response {
        let body = json!({"error": {
            "code": 400,
            "message": format!("Unable to parse range: {range}"),
            "status": "INVALID_ARGUMENT",
        }});
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }

    async fn token() -> Json<Value> {
        Json(json!({"access_token": "test-token", "expires_in": 3600, "token_type": "Bearer"}))
    }

    async fn get_values(
        State(fake): State<Arc<FakeSheets>>,
        Path((_id, range)): Path<(String, String)>,
    ) -> Response {
        fake.record(SheetsCall::Get(range.clone()));
        if fake.deny_access {
            let body = json!({"error": {
                "code": 403,
                "message": "The caller does not have permission",
                "status": "PERMISSION_DENIED",
            }});
            return (StatusCode::FORBIDDEN, Json(body)).into_response();
        }
        if !fake.exists() {
            return missing_range(&range);
        }
        let values = match *fake.stored_position.lock().unwrap() {
            Some(position) => json!([[position.to_string()]]),
            None => json!([]),
        };
        Json(json!({"range": range, "values": values})).into_response()
    }

    async fn put_values(
        State(fake): State<Arc<FakeSheets>>,
        Path((_id, range)): Path<(String, String)>,
        Json(body): Json<Value>,
    ) -> Response {
        fake.record(SheetsCall::Put {
            range: range.clone(),
            values: body["values"].clone(),
        });
        if !fake.exists() {
            return missing_range(&range);
        }
        let position = body["values"]
            .as_array()
            .and_then(|rows| rows.last())
            .and_then(|row| row[0].as_i64());
        *fake.stored_position.lock().unwrap() = position;
        Json(json!({"updatedRange": range})).into_response()
    }

    async fn batch_update(
        State(fake): State<Arc<FakeSheets>>,
        Path(_target): Path<String>,
        Json(body): Json<Value>,
    ) -> Response {
        let title = body["requests"][0]["addSheet"]["properties"]["title"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        fake.record(SheetsCall::AddSheet {
            title: title.clone(),
        });
        let already_there = fake.exists();
        *fake.config_exists.lock().unwrap() = true;
        if already_there || fake.lose_add_sheet_race {
            let message = format!(
                "Invalid requests[0].addSheet: A sheet with the name \"{title}\" already exists. Please enter another name."
            );
            let body = json!({"error": {"code": 400, "message": message, "status": "INVALID_ARGUMENT"}});
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
        Json(json!({"replies": [{"addSheet": {}}]})).into_response()
    }

    async fn spawn_client(fake: Arc<FakeSheets>) -> SheetsClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/token", post(token))
            .route("/v4/spreadsheets/{target}", post(batch_update))
            .route(
                "/v4/spreadsheets/{id}/values/{range}",
                get(get_values).put(put_values),
            )
            .with_state(fake);
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let key = ServiceAccountKey {
            client_email: "queue-bot@test.iam.gserviceaccount.com".to_string(),
            private_key: TEST_KEY_PEM.to_string(),
            token_uri: format!("http://{addr}/token"),
        };
        SheetsClient::new("test-sheet", key, Duration::from_secs(5))
            .unwrap()
            .with_base_url(&format!("http://{addr}/v4/spreadsheets/"))
            .unwrap()
            .with_retry(RetryConfig::new(
                1,
                Duration::from_millis(1),
                Duration::from_millis(5),
                2.0,
            ))
    }

    fn label_and_position(position: i64) -> Value {
        json!([["fila_position"], [position]])
    }

    #[tokio::test]
    async fn existing_position_is_read() {
        let fake = Arc::new(FakeSheets::with_position(4));
        let client = spawn_client(fake.clone()).await;

        let response = client.interpret(RosterEffect::GetStoredPosition).await.unwrap();

        assert_eq!(response, RosterResponse::Position(StoredPosition(4)));
        assert_eq!(fake.calls(), vec![SheetsCall::Get(POSITION_CELL.to_string())]);
    }

    #[tokio::test]
    async fn read_creates_missing_config_sheet_at_start() {
        let fake = Arc::new(FakeSheets::without_config_sheet());
        let client = spawn_client(fake.clone()).await;

        let response = client.interpret(RosterEffect::GetStoredPosition).await.unwrap();

        assert_eq!(response, RosterResponse::Position(StoredPosition::START));
        assert_eq!(
            fake.calls(),
            vec![
                SheetsCall::Get(POSITION_CELL.to_string()),
                SheetsCall::AddSheet {
                    title: CONFIG_SHEET.to_string()
                },
                SheetsCall::Put {
                    range: POSITION_LABEL_RANGE.to_string(),
                    values: label_and_position(0),
                },
            ]
        );

        // Later reads find the sheet it created.
        let response = client.interpret(RosterEffect::GetStoredPosition).await.unwrap();
        assert_eq!(response, RosterResponse::Position(StoredPosition::START));
        assert_eq!(fake.calls().len(), 4);
    }

    #[tokio::test]
    async fn write_creates_missing_config_sheet_then_stores_position() {
        let fake = Arc::new(FakeSheets::without_config_sheet());
        let client = spawn_client(fake.clone()).await;

        let response = client
            .interpret(RosterEffect::SetStoredPosition {
                position: StoredPosition(7),
            })
            .await
            .unwrap();

        assert_eq!(response, RosterResponse::PositionStored);
        assert_eq!(
            fake.calls(),
            vec![
                SheetsCall::Put {
                    range: POSITION_CELL.to_string(),
                    values: json!([[7]]),
                },
                SheetsCall::AddSheet {
                    title: CONFIG_SHEET.to_string()
                },
                SheetsCall::Put {
                    range: POSITION_LABEL_RANGE.to_string(),
                    values: label_and_position(7),
                },
            ]
        );
        assert_eq!(*fake.stored_position.lock().unwrap(), Some(7));
    }

    #[tokio::test]
    async fn lost_add_sheet_race_still_writes_position() {
        let fake = Arc::new(FakeSheets {
            lose_add_sheet_race: true,
            ..FakeSheets::default()
        });
        let client = spawn_client(fake.clone()).await;

        let response = client.interpret(RosterEffect::GetStoredPosition).await.unwrap();

        assert_eq!(response, RosterResponse::Position(StoredPosition::START));
        let calls = fake.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[2],
            SheetsCall::Put {
                range: POSITION_LABEL_RANGE.to_string(),
                values: label_and_position(0),
            }
        );
    }

    #[tokio::test]
    async fn other_read_failures_do_not_create_the_sheet() {
        let fake = Arc::new(FakeSheets {
            deny_access: true,
            ..FakeSheets::default()
        });
        let client = spawn_client(fake.clone()).await;

        let err = client
            .interpret(RosterEffect::GetStoredPosition)
            .await
            .unwrap_err();

        assert_eq!(err.status_code, Some(403));
        assert_eq!(fake.calls(), vec![SheetsCall::Get(POSITION_CELL.to_string())]);
    }
}
