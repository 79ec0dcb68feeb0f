//! Messaging effect interpreter backed by the Evolution API.
//!
//! Sends are never retried. A send whose response was lost may still have
//! reached the broker, so a retry could deliver the message twice.

use crate::effects::{NotifyEffect, NotifyInterpreter, NotifyResponse};

use super::client::EvolutionClient;
use super::error::EvolutionApiError;

impl NotifyInterpreter for EvolutionClient {
    type Error = EvolutionApiError;

    async fn interpret(&self, effect: NotifyEffect) -> Result<NotifyResponse, Self::Error> {
        match effect {
            NotifyEffect::SendText { number, text } => self
                .send_text(&number, &text)
                .await
                .map(NotifyResponse::Delivery),
            NotifyEffect::Probe => Ok(NotifyResponse::Reachable(self.probe().await)),
        }
    }
}
