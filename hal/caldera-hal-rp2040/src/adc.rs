//! Blocking ADC channel
//!
//! RP2040 has a single ADC; GPIO26-29 are channels 0-3.
//!
//! The thermistor is read from the control loop between two ticks, so a
//! blocking conversion (a few microseconds) is used instead of the
//! interrupt-driven async API.

use embassy_rp::adc::{Adc, Blocking, Channel, Error};

/// One ADC channel with its converter
pub struct RpAdcChannel<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> RpAdcChannel<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl caldera_hal::AdcInput for RpAdcChannel<'_> {
    type Error = Error;

    /// 12-bit conversion, 0-4095
    fn read_raw(&mut self) -> Result<u16, Error> {
        self.adc.blocking_read(&mut self.channel)
    }
}
