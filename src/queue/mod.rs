//! Queue position reconciliation.
//!
//! Pure pointer math over a stored position and a freshly read roster. Nothing
//! in this module performs I/O; the service layer fetches the inputs and
//! persists the outputs.
//!
//! The stored position is trusted only as a number. Before it is used it is
//! remapped into `[0, len)` with non-negative modulo arithmetic, so a roster
//! that shrank out from under the stored index silently wraps to a valid
//! broker instead of failing.

use thiserror::Error;

use crate::types::{Broker, Roster, StoredPosition};

mod identity;
mod lineup;

pub use identity::reconcile_by_identity;
pub use lineup::{Lineup, LineupEntry, Upcoming, lineup, upcoming};

/// Errors from reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The roster has no brokers, so there is no current position.
    #[error("no brokers in the roster")]
    EmptyRoster,
}

/// The outcome of reconciling a stored position against a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    /// Valid index into the roster, in `[0, len)`.
    pub current_index: usize,

    /// The stored value as read.
    pub stored: StoredPosition,

    /// True when `current_index` differs from the stored value, which means the
    /// roster drifted (or the cell was edited) since the position was written.
    pub changed: bool,
}

/// Remaps a stored position into a valid index for `roster`.
pub fn reconcile(stored: StoredPosition, roster: &Roster) -> Result<Reconciled, QueueError> {
    let len = roster.len();
    if len == 0 {
        return Err(QueueError::EmptyRoster);
    }

    let current_index = normalize(stored.value(), len);
    let changed = i64::try_from(current_index).map_or(true, |index| index != stored.value());

    Ok(Reconciled {
        current_index,
        stored,
        changed,
    })
}

/// Non-negative remainder of `raw` modulo `len`. `len` must be non-zero.
fn normalize(raw: i64, len: usize) -> usize {
    match i64::try_from(len) {
        // rem_euclid with a positive modulus is always in [0, len).
        Ok(modulus) => raw.rem_euclid(modulus) as usize,
        // A roster longer than i64::MAX cannot exist; any i64 >= 0 is in range.
        Err(_) => raw.unsigned_abs() as usize,
    }
}

/// Returns the broker at a reconciled index.
///
/// # Panics
///
/// Panics if `index` is out of range, which cannot happen for an index
/// produced by [`reconcile`] against the same roster.
pub fn current_broker(roster: &Roster, index: usize) -> &Broker {
    &roster.as_slice()[index]
}

/// The index after `index` in a rotation of `len` brokers.
///
/// A single-broker roster stays at 0.
pub fn advance(index: usize, len: usize) -> usize {
    debug_assert!(len > 0, "advance on an empty roster");
    (index + 1) % len.max(1)
}

/// The position a reset moves the queue to.
pub const fn reset() -> usize {
    0
}
