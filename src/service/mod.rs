//! Queue service: orchestrates the roster store, the reconciler and the
//! optional messaging backend.
//!
//! The service holds no queue state. Every operation reads the roster and the
//! stored position fresh, reconciles them, and writes back only when it
//! mutates the queue (advance, reset, sync). Read-only queries never write,
//! even when the stored position had to be remapped.
//!
//! Mutating operations are serialized by an in-process lock. The store itself
//! has no compare-and-swap, so two processes advancing at once can still lose
//! an update.

mod error;
mod outcome;


use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::effects::{
    NotifyEffect, NotifyInterpreter, NotifyResponse, RosterEffect, RosterInterpreter,
    RosterResponse,
};
use crate::notify::{MessageTemplate, SendPacing, broadcast};
use crate::queue::{self, Reconciled};
use crate::types::{Broker, Roster, StoredPosition};

pub use error::{BackendError, ServiceError, UnexpectedResponse};
pub use outcome::{
    AdvanceOutcome, NotificationOutcome, NotifierStatus, PositionChange, QueueView, ResetOutcome,
    SyncOutcome,
};

const READ_ROSTER: &str = "read the roster";
const READ_POSITION: &str = "read the queue position";
const WRITE_POSITION: &str = "write the queue position";

/// The broker queue over an injected roster store and messaging backend.
pub struct QueueService<R, N> {
    roster_source: R,
    notifier: Option<N>,
    pacing: SendPacing,
    template: MessageTemplate,
    mutation_lock: Mutex<()>,
}

impl<R, N> QueueService<R, N>
where
    R: RosterInterpreter,
    N: NotifyInterpreter,
{
    /// Creates a service. `notifier` is `None` when messaging is not
    /// configured; notification operations then fail with
    /// [`ServiceError::NotifierUnconfigured`].
    pub fn new(roster_source: R, notifier: Option<N>) -> Self {
        QueueService {
            roster_source,
            notifier,
            pacing: SendPacing::default(),
            template: MessageTemplate::default(),
            mutation_lock: Mutex::new(()),
        }
    }

    pub fn with_pacing(mut self, pacing: SendPacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn roster_source(&self) -> &R {
        &self.roster_source
    }

    pub fn notifier(&self) -> Option<&N> {
        self.notifier.as_ref()
    }

    pub fn is_notifier_configured(&self) -> bool {
        self.notifier.is_some()
    }

    // ─── Operations ─────────────────────────────────────────────────────────

    /// Returns the current broker and who follows, without advancing.
    pub async fn get_current(&self) -> Result<QueueView, ServiceError> {
        let (roster, reconciled) = self.snapshot().await?;
        let index = reconciled.current_index;

        Ok(QueueView {
            current: queue::current_broker(&roster, index).clone(),
            upcoming: upcoming_after(&roster, index),
            changed: reconciled.changed,
            fingerprint: roster.fingerprint(),
            stored_position: reconciled.stored,
            current_index: index,
        })
    }

    /// Moves the queue one broker forward and persists the new position.
    ///
    /// A failed write does not fail the call: the outcome describes the
    /// advance and carries the write error in `persist_error`. With `notify`
    /// set, every broker is sent their new place, starting with the new
    /// current broker.
    pub async fn advance(&self, notify: bool) -> Result<AdvanceOutcome, ServiceError> {
        let notifier = match (notify, &self.notifier) {
            (true, None) => return Err(ServiceError::NotifierUnconfigured),
            (true, Some(notifier)) => Some(notifier),
            (false, _) => None,
        };

        let guard = self.mutation_lock.lock().await;
        let (roster, reconciled) = self.snapshot().await?;
        let from = reconciled.current_index;
        let to = queue::advance(from, roster.len());

        let persist_error = match self.write_position(to).await {
            Ok(()) => None,
            Err(e) => {
                error!(error = %e, from, to, "queue advanced but the new position was not saved");
                Some(e.to_string())
            }
        };
        drop(guard);

        let previous = queue::current_broker(&roster, from).clone();
        let current = queue::current_broker(&roster, to).clone();
        info!(previous = %previous, current = %current, from, to, "queue advanced");

        let notifications = match notifier {
            Some(notifier) => Some(
                broadcast(
                    notifier,
                    queue::lineup(&roster, to),
                    &self.pacing,
                    &self.template,
                )
                .await,
            ),
            None => None,
        };

        Ok(AdvanceOutcome {
            previous,
            current,
            upcoming: upcoming_after(&roster, to),
            changed: reconciled.changed,
            position: PositionChange { from, to },
            persist_error,
            notifications,
        })
    }

    /// Puts the first broker of the roster back at the front of the queue.
    pub async fn reset(&self) -> Result<ResetOutcome, ServiceError> {
        let _guard = self.mutation_lock.lock().await;
        let roster = self.read_roster().await?;
        if roster.is_empty() {
            return Err(ServiceError::EmptyRoster);
        }

        let index = queue::reset();
        self.write_position(index).await?;

        let current = queue::current_broker(&roster, index).clone();
        info!(current = %current, "queue reset");
        Ok(ResetOutcome {
            current,
            upcoming: upcoming_after(&roster, index),
        })
    }

    /// Sends every broker their place in the current queue, without advancing.
    pub async fn send_notifications(&self) -> Result<NotificationOutcome, ServiceError> {
        let notifier = self
            .notifier
            .as_ref()
            .ok_or(ServiceError::NotifierUnconfigured)?;

        let (roster, reconciled) = self.snapshot().await?;
        let index = reconciled.current_index;
        let target = queue::current_broker(&roster, index).clone();
        info!(
            current = %target,
            brokers = roster.len(),
            "sending queue notifications"
        );

        let report = broadcast(
            notifier,
            queue::lineup(&roster, index),
            &self.pacing,
            &self.template,
        )
        .await;

        info!(
            total = report.stats.total,
            successes = report.stats.successes,
            failures = report.stats.failures,
            "queue notifications processed"
        );
        Ok(NotificationOutcome { target, report })
    }

    /// Reports whether messaging is configured and, if so, whether the
    /// endpoint answers.
    pub async fn notification_config_status(&self) -> NotifierStatus {
        let Some(notifier) = &self.notifier else {
            return NotifierStatus {
                configured: false,
                endpoint_reachable: None,
            };
        };

        let reachable = match notifier.interpret(NotifyEffect::Probe).await {
            Ok(NotifyResponse::Reachable(reachable)) => reachable,
            Ok(other) => {
                debug!(response = ?other, "unexpected response to probe");
                false
            }
            Err(e) => {
                debug!(error = %e, "messaging endpoint probe failed");
                false
            }
        };

        NotifierStatus {
            configured: true,
            endpoint_reachable: Some(reachable),
        }
    }

    /// Writes the reconciled position back when it differs from the stored
    /// one. This is how a drifted position heals without advancing.
    pub async fn sync_position(&self) -> Result<SyncOutcome, ServiceError> {
        let _guard = self.mutation_lock.lock().await;
        let (_, reconciled) = self.snapshot().await?;

        if reconciled.changed {
            self.write_position(reconciled.current_index).await?;
            info!(
                stored = %reconciled.stored,
                corrected = reconciled.current_index,
                "queue position corrected"
            );
        }

        Ok(SyncOutcome {
            stored_position: reconciled.stored,
            corrected_position: reconciled.current_index,
            changed: reconciled.changed,
            persisted: reconciled.changed,
        })
    }

    // ─── Roster store access ────────────────────────────────────────────────

    /// Reads the roster and the stored position and reconciles them.
    async fn snapshot(&self) -> Result<(Roster, Reconciled), ServiceError> {
        let roster = self.read_roster().await?;
        if roster.is_empty() {
            return Err(ServiceError::EmptyRoster);
        }

        let stored = self.read_position().await?;
        let reconciled = queue::reconcile(stored, &roster)?;
        if reconciled.changed {
            info!(
                stored = %stored,
                current_index = reconciled.current_index,
                brokers = roster.len(),
                "stored position remapped to the current roster"
            );
        }
        Ok((roster, reconciled))
    }

    async fn read_roster(&self) -> Result<Roster, ServiceError> {
        match self.roster_source.interpret(RosterEffect::ListBrokers).await {
            Ok(RosterResponse::Brokers(roster)) => {
                debug!(brokers = roster.len(), "roster loaded");
                Ok(roster)
            }
            Ok(other) => Err(unexpected(READ_ROSTER, "list_brokers", &other)),
            Err(e) => Err(ServiceError::roster_source(READ_ROSTER, e)),
        }
    }

    async fn read_position(&self) -> Result<StoredPosition, ServiceError> {
        match self
            .roster_source
            .interpret(RosterEffect::GetStoredPosition)
            .await
        {
            Ok(RosterResponse::Position(position)) => Ok(position),
            Ok(other) => Err(unexpected(READ_POSITION, "get_stored_position", &other)),
            Err(e) => Err(ServiceError::roster_source(READ_POSITION, e)),
        }
    }

    async fn write_position(&self, index: usize) -> Result<(), ServiceError> {
        let effect = RosterEffect::SetStoredPosition {
            position: StoredPosition::from(index),
        };
        match self.roster_source.interpret(effect).await {
            Ok(RosterResponse::PositionStored) => Ok(()),
            Ok(other) => Err(unexpected(WRITE_POSITION, "set_stored_position", &other)),
            Err(e) => Err(ServiceError::roster_source(WRITE_POSITION, e)),
        }
    }
}

fn upcoming_after(roster: &Roster, index: usize) -> Vec<Broker> {
    queue::upcoming(roster, index, roster.len())
        .cloned()
        .collect()
}

fn unexpected(
    operation: &'static str,
    effect: &'static str,
    response: &RosterResponse,
) -> ServiceError {
    let response = match response {
        RosterResponse::Brokers(_) => "brokers",
        RosterResponse::Position(_) => "position",
        RosterResponse::PositionStored => "position_stored",
    };
    ServiceError::roster_source(
        operation,
        UnexpectedResponse {
            effect,
            response: response.to_string(),
        },
    )
}
