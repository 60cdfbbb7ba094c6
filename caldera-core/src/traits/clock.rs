//! Monotonic millisecond clock

use crate::time::Millis;

/// Free-running millisecond clock
///
/// The value wraps at 2^32; use [`crate::time::elapsed`] for durations.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> Millis;
}
