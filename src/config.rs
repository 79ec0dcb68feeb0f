//! Runtime configuration from environment variables.
//!
//! Values are read from the process environment after loading a `.env` file
//! if one exists. Deployment templates ship placeholder values; those are
//! treated as unset so a half-configured deployment reports "not configured"
//! instead of failing on its first backend call.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::evolution::{EvolutionApiError, EvolutionClient};
use crate::notify::{DEFAULT_SIGNATURE, MessageTemplate, SendPacing};
use crate::sheets::{SheetsApiError, SheetsClient};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NOTIFY_DELAY_MIN_MS: u64 = 3_000;
pub const DEFAULT_NOTIFY_DELAY_MAX_MS: u64 = 8_000;

const SPREADSHEET_ID: &str = "SPREADSHEET_ID";
const GOOGLE_CREDENTIALS_JSON: &str = "GOOGLE_CREDENTIALS_JSON";
const EVOLUTION_API_URL: &str = "EVOLUTION_API_URL";
const EVOLUTION_API_KEY: &str = "EVOLUTION_API_KEY";
const BIND_ADDR: &str = "BIND_ADDR";
const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
const NOTIFY_DELAY_MIN_MS: &str = "NOTIFY_DELAY_MIN_MS";
const NOTIFY_DELAY_MAX_MS: &str = "NOTIFY_DELAY_MAX_MS";
const NOTIFY_SIGNATURE: &str = "NOTIFY_SIGNATURE";

const PLACEHOLDER_SHEET_ID: &[&str] = &["placeholder_sheet_id"];
const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "{}",
    r#"{"type":"service_account","project_id":"placeholder"}"#,
];
const PLACEHOLDER_API_URL: &[&str] = &["https://placeholder-api.com/api"];
const PLACEHOLDER_API_KEY: &[&str] = &["placeholder_key"];

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var} ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Spreadsheet location and service-account credentials.
#[derive(Clone)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub credentials_json: String,
}

impl std::fmt::Debug for SheetsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsSettings")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

/// Evolution API endpoint and key.
#[derive(Clone)]
pub struct EvolutionSettings {
    pub api_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for EvolutionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionSettings")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Which backend variables hold real values. Reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EnvStatus {
    pub spreadsheet_id: bool,
    pub google_credentials_json: bool,
    pub evolution_api_url: bool,
    pub evolution_api_key: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub http_timeout: Duration,
    pub pacing: SendPacing,
    pub signature: String,
    pub sheets: Option<SheetsSettings>,
    /// `None` when either the URL or the key is missing.
    pub evolution: Option<EvolutionSettings>,
    pub env_status: EnvStatus,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let spreadsheet_id = configured(lookup(SPREADSHEET_ID), PLACEHOLDER_SHEET_ID);
        let credentials_json =
            configured(lookup(GOOGLE_CREDENTIALS_JSON), PLACEHOLDER_CREDENTIALS);
        let api_url = configured(lookup(EVOLUTION_API_URL), PLACEHOLDER_API_URL);
        let api_key = configured(lookup(EVOLUTION_API_KEY), PLACEHOLDER_API_KEY);

        let env_status = EnvStatus {
            spreadsheet_id: spreadsheet_id.is_some(),
            google_credentials_json: credentials_json.is_some(),
            evolution_api_url: api_url.is_some(),
            evolution_api_key: api_key.is_some(),
        };

        let sheets = match (spreadsheet_id, credentials_json) {
            (Some(spreadsheet_id), Some(credentials_json)) => Some(SheetsSettings {
                spreadsheet_id,
                credentials_json,
            }),
            _ => None,
        };
        let evolution = match (api_url, api_key) {
            (Some(api_url), Some(api_key)) => Some(EvolutionSettings { api_url, api_key }),
            _ => None,
        };

        let bind_addr_raw = lookup(BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: BIND_ADDR,
                value: bind_addr_raw.clone(),
                reason: e.to_string(),
            })?;

        let timeout_secs = parse_u64(&lookup, HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: HTTP_TIMEOUT_SECS,
                value: timeout_secs.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let min_ms = parse_u64(&lookup, NOTIFY_DELAY_MIN_MS, DEFAULT_NOTIFY_DELAY_MIN_MS)?;
        let max_ms = parse_u64(&lookup, NOTIFY_DELAY_MAX_MS, DEFAULT_NOTIFY_DELAY_MAX_MS)?;

        let signature = lookup(NOTIFY_SIGNATURE)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SIGNATURE.to_string());

        Ok(Config {
            bind_addr,
            http_timeout: Duration::from_secs(timeout_secs),
            pacing: SendPacing::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms)),
            signature,
            sheets,
            evolution,
            env_status,
        })
    }

    pub fn message_template(&self) -> MessageTemplate {
        MessageTemplate::new(&self.signature)
    }

    /// Builds the spreadsheet client. The roster store is mandatory.
    pub fn sheets_client(&self) -> Result<SheetsClient, SheetsClientError> {
        let settings = self
            .sheets
            .as_ref()
            .ok_or(SheetsClientError::Unconfigured)?;
        Ok(SheetsClient::from_credentials_json(
            &settings.spreadsheet_id,
            &settings.credentials_json,
            self.http_timeout,
        )?)
    }

    /// Builds the messaging client, or `None` when messaging is unconfigured.
    pub fn evolution_client(&self) -> Result<Option<EvolutionClient>, EvolutionApiError> {
        self.evolution
            .as_ref()
            .map(|settings| {
                EvolutionClient::new(&settings.api_url, &settings.api_key, self.http_timeout)
            })
            .transpose()
    }
}

/// Errors from building the spreadsheet client.
#[derive(Debug, Error)]
pub enum SheetsClientError {
    #[error("Google Sheets is not configured (set SPREADSHEET_ID and GOOGLE_CREDENTIALS_JSON)")]
    Unconfigured,

    #[error(transparent)]
    Client(#[from] SheetsApiError),
}

/// Trims `value` and drops it if empty or a known placeholder.
fn configured(value: Option<String>, placeholders: &[&str]) -> Option<String> {
    let value = value?.trim().to_string();
    if value.is_empty() || placeholders.contains(&value.as_str()) {
        None
    } else {
        Some(value)
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }
        }),
    }
}
