//! Boiler NTC thermistor
//!
//! The thermistor sits in a divider on an ADC channel. This driver only
//! returns raw converter codes; averaging and calibration happen in the
//! core (see `caldera_core::calibration`).
//!
//! After each conversion the driver waits a short settling delay before
//! returning. This is the only blocking call in the control loop.

use caldera_core::traits::{RawSensor, SensorError};
use caldera_hal::AdcInput;
use embedded_hal::delay::DelayNs;

/// Default settling delay after a conversion (ms)
pub const DEFAULT_SETTLE_MS: u32 = 10;

/// NTC thermistor on an ADC channel
pub struct Thermistor<A, D> {
    adc: A,
    delay: D,
    settle_ms: u32,
}

impl<A: AdcInput, D: DelayNs> Thermistor<A, D> {
    /// Create a thermistor sensor
    ///
    /// # Arguments
    /// - `adc`: ADC channel the divider is wired to
    /// - `delay`: Blocking delay provider
    /// - `settle_ms`: Wait after each conversion
    pub fn new(adc: A, delay: D, settle_ms: u32) -> Self {
        Self {
            adc,
            delay,
            settle_ms,
        }
    }

    /// Create a sensor with the default settling delay
    pub fn with_default_settle(adc: A, delay: D) -> Self {
        Self::new(adc, delay, DEFAULT_SETTLE_MS)
    }

    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }
}

impl<A: AdcInput, D: DelayNs> RawSensor for Thermistor<A, D> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let raw = self
            .adc
            .read_raw()
            .map_err(|_| SensorError::Conversion)?;

        self.delay.delay_ms(self.settle_ms);

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dummy ADC returning a fixed code, or failing
    struct DummyAdc {
        value: Option<u16>,
    }

    impl AdcInput for DummyAdc {
        type Error = ();

        fn read_raw(&mut self) -> Result<u16, ()> {
            self.value.ok_or(())
        }
    }

    /// Delay that only records how long it was asked to wait
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_returns_raw_code() {
        let mut sensor = Thermistor::with_default_settle(
            DummyAdc { value: Some(2_048) },
            MockDelay::default(),
        );

        assert_eq!(sensor.read_raw(), Ok(2_048));
    }

    #[test]
    fn test_waits_after_each_read() {
        let mut sensor = Thermistor::new(DummyAdc { value: Some(1) }, MockDelay::default(), 10);

        sensor.read_raw().unwrap();
        sensor.read_raw().unwrap();

        assert_eq!(sensor.delay.total_ns, 20_000_000);
    }

    #[test]
    fn test_conversion_failure() {
        let mut sensor =
            Thermistor::with_default_settle(DummyAdc { value: None }, MockDelay::default());

        assert_eq!(sensor.read_raw(), Err(SensorError::Conversion));
        // No settling after a failed conversion
        assert_eq!(sensor.delay.total_ns, 0);
    }
}
