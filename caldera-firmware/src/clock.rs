//! Millisecond clock over the embassy time driver

use caldera_core::time::Millis;
use caldera_core::traits::Clock;
use embassy_time::Instant;

/// Uptime in milliseconds, truncated to 32 bits
///
/// Wraps after about 49.7 days; the core only ever computes durations
/// with wraparound-safe subtraction.
#[derive(Clone, Copy)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> Millis {
        Instant::now().as_millis() as Millis
    }
}
