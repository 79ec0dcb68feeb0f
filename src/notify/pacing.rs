//! Spacing between consecutive sends.

use std::time::Duration;

use rand::Rng;

/// Uniform random delay inserted between consecutive notification sends.
///
/// The messaging backend bans numbers that send bursts, so a batch is never
/// sent back to back. No delay follows the last send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendPacing {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl SendPacing {
    /// No delay at all. For tests and dry runs.
    pub const NONE: SendPacing = SendPacing {
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };

    /// Default spacing: 3 to 8 seconds.
    pub const DEFAULT: SendPacing = SendPacing {
        min_delay: Duration::from_secs(3),
        max_delay: Duration::from_secs(8),
    };

    /// Creates a pacing policy. Bounds given in the wrong order are swapped.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        if min_delay <= max_delay {
            SendPacing {
                min_delay,
                max_delay,
            }
        } else {
            SendPacing {
                min_delay: max_delay,
                max_delay: min_delay,
            }
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.max_delay.is_zero()
    }

    /// Draws the next delay from `[min_delay, max_delay]`.
    pub fn next_delay(&self) -> Duration {
        if self.min_delay >= self.max_delay {
            return self.min_delay;
        }
        let min = duration_millis(self.min_delay);
        let max = duration_millis(self.max_delay);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

impl Default for SendPacing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
