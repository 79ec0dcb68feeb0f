//! Service-account authentication for the Sheets API.
//!
//! Access tokens are minted with the OAuth 2.0 JWT-bearer grant: an RS256
//! assertion signed with the service account's private key is exchanged at
//! the account's token endpoint. Tokens are cached until shortly before they
//! expire.

use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::error::SheetsApiError;

/// OAuth scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime; Google caps it at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The fields of a service-account key file this client needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parses the JSON key file contents.
    pub fn from_json(json: &str) -> Result<Self, SheetsApiError> {
        serde_json::from_str(json).map_err(|e| {
            SheetsApiError::permanent_without_source(format!(
                "invalid service account credentials: {e}"
            ))
        })
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Mints and caches access tokens for one service account.
pub struct TokenSource {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey) -> Result<Self, SheetsApiError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            SheetsApiError::permanent_without_source(format!(
                "invalid service account private key: {e}"
            ))
        })?;
        Ok(Self {
            key,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Returns a valid access token, minting a new one if needed.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, SheetsApiError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.token.clone());
        }

        let fresh = self.fetch_token(http).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    fn sign_assertion(&self) -> Result<String, SheetsApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key).map_err(
            |e| SheetsApiError::permanent_without_source(format!("failed to sign assertion: {e}")),
        )
    }

    async fn fetch_token(&self, http: &reqwest::Client) -> Result<CachedToken, SheetsApiError> {
        let assertion = self.sign_assertion()?;
        debug!(client_email = %self.key.client_email, "requesting Sheets access token");

        let response = http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(SheetsApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsApiError::from_status(status.as_u16(), body));
        }

        let token: TokenResponse = response.json().await.map_err(SheetsApiError::from_reqwest)?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            token: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("client_email", &self.key.client_email)
            .finish_non_exhaustive()
    }
}
