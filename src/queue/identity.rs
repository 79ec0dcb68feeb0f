//! Identity-based reconciliation.
//!
//! The service tracks rotation by numeric index only, which cannot tell a
//! same-length roster with different membership apart from an unchanged one.
//! Callers that also persist the identity of the current broker can use
//! [`reconcile_by_identity`] instead: it follows the broker rather than the
//! number, and falls back to index-modulo when the broker is gone.

use crate::types::{BrokerId, Roster, StoredPosition};

use super::{QueueError, Reconciled, reconcile};

/// Reconciles by locating `last_current` in `roster`.
///
/// `changed` is true whenever the resulting index differs from the stored
/// value, exactly as for [`reconcile`].
pub fn reconcile_by_identity(
    stored: StoredPosition,
    roster: &Roster,
    last_current: Option<&BrokerId>,
) -> Result<Reconciled, QueueError> {
    let by_index = reconcile(stored, roster)?;

    let Some(current_index) = last_current.and_then(|id| roster.position_of(id)) else {
        return Ok(by_index);
    };

    Ok(Reconciled {
        current_index,
        stored,
        changed: i64::try_from(current_index).map_or(true, |index| index != stored.value()),
    })
}
