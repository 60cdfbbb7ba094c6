//! Analog input abstraction
//!
//! The thermistor divider is the only analog signal on the board, so the
//! trait is deliberately minimal: one blocking conversion per call.

/// Single-ended analog input channel
pub trait AdcInput {
    /// Error type for a failed conversion
    type Error;

    /// Perform one conversion and return the raw code
    ///
    /// The code range depends on the converter (0-4095 for a 12-bit ADC).
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}
