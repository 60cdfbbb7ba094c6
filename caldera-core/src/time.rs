//! Wraparound-safe time arithmetic
//!
//! The control loop runs on a free-running millisecond counter that is
//! only 32 bits wide and wraps roughly every 49.7 days. Every duration in
//! the core goes through [`elapsed`]; timestamps are never subtracted
//! directly.

/// Millisecond timestamp on a clock that wraps at 2^32
pub type Millis = u32;

/// Duration between two readings of the wrapping millisecond clock
///
/// If `later` is numerically smaller than `earlier` the clock wrapped in
/// between, and the result is measured across the wrap. Wrapping
/// subtraction on `u32` is exactly subtraction modulo 2^32.
#[inline]
pub const fn elapsed(earlier: Millis, later: Millis) -> Millis {
    later.wrapping_sub(earlier)
}
