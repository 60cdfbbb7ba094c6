//! External enable input

/// Trait for the external enable signal
///
/// Typically a room thermostat or a panel switch wired to a GPIO. When
/// the signal is off the controller reports `Disabled` and keeps the
/// relay open, but its internal evaluation continues.
pub trait EnableSignal {
    /// Sample the enable input
    fn is_enabled(&mut self) -> bool;
}
