//! Rolling average over raw sensor readings
//!
//! Raw ADC codes are noisy; the thermostat averages the last
//! [`SAMPLE_SET_SIZE`] readings before converting to temperature. Each
//! reading is scaled by [`SAMPLE_SCALE`] on the way in so the average
//! keeps two decimals without floating point.

/// Default number of readings in the rolling window
pub const SAMPLE_SET_SIZE: usize = 10;

/// Fixed-point multiplier applied to every raw reading
pub const SAMPLE_SCALE: i32 = 100;

/// Fixed-capacity ring buffer of scaled readings
///
/// The average is undefined until the ring has been written all the way
/// round once; a partially filled buffer never yields a value.
#[derive(Debug, Clone)]
pub struct SampleBuffer<const N: usize = SAMPLE_SET_SIZE> {
    samples: [i32; N],
    /// Next slot to write
    cursor: usize,
    /// Set once the cursor has wrapped
    full: bool,
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        assert!(N > 0, "sample buffer needs at least one slot");
        Self {
            samples: [0; N],
            cursor: 0,
            full: false,
        }
    }

    /// Store a raw reading at the cursor and advance
    pub fn push(&mut self, raw: u16) {
        self.samples[self.cursor] = raw as i32 * SAMPLE_SCALE;
        self.cursor = (self.cursor + 1) % N;

        if self.cursor == 0 {
            self.full = true;
        }
    }

    /// Truncating mean of all slots, or `None` until the buffer is full
    pub fn average(&self) -> Option<i32> {
        if !self.full {
            return None;
        }

        let sum: i64 = self.samples.iter().map(|&s| s as i64).sum();
        Some((sum / N as i64) as i32)
    }

    /// Whether a full window has been collected
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Forget all readings; the average becomes undefined again
    pub fn clear(&mut self) {
        self.samples = [0; N];
        self.cursor = 0;
        self.full = false;
    }

    /// Window size
    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_until_full() {
        let mut buf = SampleBuffer::<10>::new();

        for i in 0..9 {
            buf.push(500);
            assert_eq!(buf.average(), None, "defined after {} samples", i + 1);
        }

        buf.push(500);
        assert!(buf.is_full());
        assert_eq!(buf.average(), Some(50_000));
    }

    #[test]
    fn test_average_truncates() {
        let mut buf = SampleBuffer::<3>::new();
        buf.push(1);
        buf.push(1);
        buf.push(2);
        // (100 + 100 + 200) / 3 = 133.33
        assert_eq!(buf.average(), Some(133));
    }

    #[test]
    fn test_rolling_window_replaces_oldest() {
        let mut buf = SampleBuffer::<4>::new();
        for _ in 0..4 {
            buf.push(400);
        }
        assert_eq!(buf.average(), Some(40_000));

        buf.push(800);
        // 3 × 40000 + 80000
        assert_eq!(buf.average(), Some(50_000));
    }

    #[test]
    fn test_clear_makes_average_undefined() {
        let mut buf = SampleBuffer::<2>::new();
        buf.push(10);
        buf.push(10);
        assert!(buf.average().is_some());

        buf.clear();
        assert_eq!(buf.average(), None);

        buf.push(10);
        assert_eq!(buf.average(), None);
    }

    #[test]
    fn test_full_scale_reading_does_not_overflow() {
        let mut buf = SampleBuffer::<10>::new();
        for _ in 0..10 {
            buf.push(u16::MAX);
        }
        assert_eq!(buf.average(), Some(u16::MAX as i32 * SAMPLE_SCALE));
    }
}
