//! Sequential notification fan-out.

use serde::Serialize;
use tracing::{info, warn};

use super::message::MessageTemplate;
use super::pacing::SendPacing;
use crate::effects::{NotifyEffect, NotifyInterpreter, NotifyResponse};
use crate::queue::Lineup;

/// Outcome of one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationResult {
    pub broker_name: String,
    pub phone_number: String,
    /// 1-based place in line at the time of the send.
    pub place: usize,
    pub success: bool,
    /// HTTP status of the send; `None` when the request never got a response.
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate counts over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NotificationStats {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Percentage of successful sends, 0 for an empty batch.
    pub success_rate: f64,
}

impl NotificationStats {
    pub fn from_results(results: &[NotificationResult]) -> Self {
        let total = results.len();
        let successes = results.iter().filter(|r| r.success).count();
        let success_rate = if total == 0 {
            0.0
        } else {
            successes as f64 / total as f64 * 100.0
        };
        NotificationStats {
            total,
            successes,
            failures: total - successes,
            success_rate,
        }
    }
}

/// Every per-broker result of a batch plus the aggregate counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationReport {
    pub stats: NotificationStats,
    pub results: Vec<NotificationResult>,
}

impl NotificationReport {
    pub fn new(results: Vec<NotificationResult>) -> Self {
        NotificationReport {
            stats: NotificationStats::from_results(&results),
            results,
        }
    }
}

/// Sends the status message to every broker in `lineup`, one at a time.
///
/// A failed send is recorded and the batch continues. `pacing` decides the
/// pause between sends; there is no pause after the last one.
pub async fn broadcast<N: NotifyInterpreter>(
    interpreter: &N,
    lineup: Lineup<'_>,
    pacing: &SendPacing,
    template: &MessageTemplate,
) -> NotificationReport {
    let Some(current) = lineup.clone().next().map(|entry| entry.broker) else {
        return NotificationReport::new(Vec::new());
    };

    let total = lineup.len();
    let mut results = Vec::with_capacity(total);

    for (i, entry) in lineup.enumerate() {
        let text = template.render(&entry, current);
        let effect = NotifyEffect::SendText {
            number: entry.broker.phone_number.clone(),
            text,
        };

        let (success, status_code, error) = match interpreter.interpret(effect).await {
            Ok(NotifyResponse::Delivery(receipt)) => {
                (receipt.accepted, Some(receipt.status_code), receipt.detail)
            }
            Ok(other) => (
                false,
                None,
                Some(format!("unexpected response to send: {other:?}")),
            ),
            Err(e) => (false, None, Some(e.to_string())),
        };

        if success {
            info!(broker = %entry.broker, place = entry.place, "notification sent");
        } else {
            warn!(
                broker = %entry.broker,
                place = entry.place,
                status_code,
                error = error.as_deref().unwrap_or(""),
                "notification failed"
            );
        }

        results.push(NotificationResult {
            broker_name: entry.broker.name.clone(),
            phone_number: entry.broker.phone_number.clone(),
            place: entry.place,
            success,
            status_code,
            error,
        });

        if i + 1 < total && !pacing.is_disabled() {
            let delay = pacing.next_delay();
            info!(delay_ms = delay.as_millis() as u64, "waiting before next send");
            tokio::time::sleep(delay).await;
        }
    }

    NotificationReport::new(results)
}
