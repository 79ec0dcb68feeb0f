//! Evolution API client for WhatsApp text messages.

use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use tracing::debug;

use super::error::EvolutionApiError;
use crate::effects::DeliveryReceipt;

/// Header carrying the instance API key.
const HEADER_API_KEY: &str = "apikey";

/// A client for one Evolution API `sendText` endpoint.
///
/// The configured URL is the full send endpoint, e.g.
/// `https://evo.example.com/message/sendText/<instance>`.
#[derive(Clone)]
pub struct EvolutionClient {
    http: reqwest::Client,
    send_url: Url,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SendTextPayload<'a> {
    number: &'a str,
    text: &'a str,
}

impl EvolutionClient {
    /// Creates a client. `timeout` bounds every HTTP call.
    pub fn new(
        send_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EvolutionApiError> {
        let send_url = Url::parse(send_url).map_err(|e| {
            EvolutionApiError::permanent_without_source(format!("invalid Evolution API URL: {e}"))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EvolutionApiError::from_reqwest)?;
        Ok(Self {
            http,
            send_url,
            api_key: api_key.into(),
        })
    }

    pub fn send_url(&self) -> &Url {
        &self.send_url
    }

    /// Sends a text message. Non-2xx answers come back as rejected receipts.
    pub async fn send_text(
        &self,
        number: &str,
        text: &str,
    ) -> Result<DeliveryReceipt, EvolutionApiError> {
        let response = self
            .http
            .post(self.send_url.clone())
            .header(HEADER_API_KEY, &self.api_key)
            .json(&SendTextPayload { number, text })
            .send()
            .await
            .map_err(EvolutionApiError::from_reqwest)?;

        let status = response.status().as_u16();
        if is_accepted_status(status) {
            debug!(status, "message accepted");
            return Ok(DeliveryReceipt::accepted(status));
        }
        let body = response.text().await.unwrap_or_default();
        Ok(DeliveryReceipt::rejected(status, body))
    }

    /// Returns true if the API host answers HTTP at all.
    ///
    /// Probes the URL origin rather than the send endpoint so no message is
    /// attempted; any status code, even an error, proves reachability.
    pub async fn probe(&self) -> bool {
        let mut origin = self.send_url.clone();
        origin.set_path("/");
        origin.set_query(None);
        match self.http.get(origin).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Evolution API probe failed");
                false
            }
        }
    }
}

/// The Evolution API answers 201 for queued messages and 200 for some
/// instance types; both mean the message was accepted.
fn is_accepted_status(status: u16) -> bool {
    matches!(status, 200 | 201)
}

impl std::fmt::Debug for EvolutionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionClient")
            .field("send_url", &self.send_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_statuses() {
        assert!(is_accepted_status(200));
        assert!(is_accepted_status(201));
        assert!(!is_accepted_status(202));
        assert!(!is_accepted_status(400));
        assert!(!is_accepted_status(500));
    }

    #[test]
    fn rejects_invalid_url() {
        let err = EvolutionClient::new("not a url", "key", Duration::from_secs(1)).unwrap_err();
        assert!(err.message.contains("invalid Evolution API URL"));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = EvolutionClient::new(
            "https://evo.example.com/message/sendText/inst",
            "super-secret",
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[test]
    fn payload_shape() {
        let json = serde_json::to_value(SendTextPayload {
            number: "5511999990000",
            text: "hi",
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"number": "5511999990000", "text": "hi"})
        );
    }
}
