//! Sheets REST client scoped to a single spreadsheet.
//!
//! All operations performed through this client target the same spreadsheet,
//! matching the design where `RosterEffect` variants carry no spreadsheet id.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};

use super::auth::{ServiceAccountKey, TokenSource};
use super::error::SheetsApiError;
use crate::retry::RetryConfig;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

/// A Google Sheets API client scoped to one spreadsheet.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    auth: Arc<TokenSource>,
    spreadsheet_id: String,
    base_url: Url,
    retry: RetryConfig,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsClient {
    /// Creates a client authenticated as the given service account.
    ///
    /// `timeout` bounds every HTTP call, token requests included.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        key: ServiceAccountKey,
        timeout: Duration,
    ) -> Result<Self, SheetsApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SheetsApiError::from_reqwest)?;
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| SheetsApiError::permanent_without_source(e.to_string()))?;

        Ok(Self {
            http,
            auth: Arc::new(TokenSource::new(key)?),
            spreadsheet_id: spreadsheet_id.into(),
            base_url,
            retry: RetryConfig::DEFAULT,
        })
    }

    /// Creates a client from the raw credentials JSON.
    pub fn from_credentials_json(
        spreadsheet_id: impl Into<String>,
        credentials_json: &str,
        timeout: Duration,
    ) -> Result<Self, SheetsApiError> {
        let key = ServiceAccountKey::from_json(credentials_json)?;
        Self::new(spreadsheet_id, key, timeout)
    }

    /// Points the client at another Sheets API root, e.g. a local emulator.
    /// The root is the collection URL that spreadsheet ids are appended to.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, SheetsApiError> {
        self.base_url = Url::parse(base_url).map_err(|e| {
            SheetsApiError::permanent_without_source(format!("invalid Sheets API URL: {e}"))
        })?;
        Ok(self)
    }

    /// Overrides the retry configuration used by the interpreter.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    /// Builds `<base>/<spreadsheet_id><suffix>/<segments...>` with each
    /// segment percent-encoded (ranges contain `!` and may contain spaces).
    fn url(&self, suffix: &str, segments: &[&str]) -> Result<Url, SheetsApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                SheetsApiError::permanent_without_source("Sheets base URL cannot be a base")
            })?;
            path.pop_if_empty();
            path.push(&format!("{}{}", self.spreadsheet_id, suffix));
            path.extend(segments);
        }
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, SheetsApiError> {
        let token = self.auth.access_token(&self.http).await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(SheetsApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsApiError::from_status(status.as_u16(), body));
        }
        response.json().await.map_err(SheetsApiError::from_reqwest)
    }

    /// Reads a range as rows of cells. Missing trailing cells are omitted by
    /// the API, so rows may be ragged.
    pub async fn get_values(&self, range: &str) -> Result<Vec<Vec<Value>>, SheetsApiError> {
        let url = self.url("", &["values", range])?;
        let body = self.send(self.http.get(url)).await?;
        let parsed: ValueRange = serde_json::from_value(body).map_err(|e| {
            SheetsApiError::permanent_without_source(format!("unexpected values response: {e}"))
        })?;
        Ok(parsed.values)
    }

    /// Overwrites a range with raw (unparsed) values.
    pub async fn put_values(
        &self,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<(), SheetsApiError> {
        let mut url = self.url("", &["values", range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });
        self.send(self.http.put(url).json(&body)).await?;
        Ok(())
    }

    /// Adds a worksheet to the spreadsheet.
    pub async fn add_sheet(&self, title: &str, rows: u32, columns: u32) -> Result<(), SheetsApiError> {
        let url = self.url(":batchUpdate", &[])?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": columns }
                    }
                }
            }]
        });
        self.send(self.http.post(url).json(&body)).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("service_account", &self.auth.client_email())
            .finish_non_exhaustive()
    }
}
