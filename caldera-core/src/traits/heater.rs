//! Heater relay and temperature sensor traits

/// Errors that can occur while acquiring a raw sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    Conversion,
}

/// Trait for the raw thermistor reading
///
/// Returns uncalibrated converter codes; calibration and averaging
/// happen in the core. Implementations may block for a short, bounded
/// settling delay. This is the only blocking call in a control tick.
pub trait RawSensor {
    /// Acquire one raw reading
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Trait for heater output control
///
/// Implementations control the heater element via GPIO, relay, or SSR.
pub trait HeaterOutput {
    /// Turn the heater on or off
    fn set_on(&mut self, on: bool);

    /// Check if the heater is currently on
    fn is_on(&self) -> bool;
}
