//! Enable input
//!
//! The room thermostat or panel switch that allows the boiler to run.

use caldera_core::traits::EnableSignal;
use caldera_hal::InputPin;

/// Enable switch on a GPIO input
pub struct EnableSwitch<P> {
    pin: P,
    /// If true, enabled = pin LOW (switch to ground with pull-up)
    inverted: bool,
}

impl<P: InputPin> EnableSwitch<P> {
    /// Create an enable input
    ///
    /// # Arguments
    /// - `pin`: The GPIO input
    /// - `inverted`: If true, a LOW level means enabled
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }
}

impl<P: InputPin> EnableSignal for EnableSwitch<P> {
    fn is_enabled(&mut self) -> bool {
        self.pin.is_high() != self.inverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockInput(bool);

    impl InputPin for MockInput {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_active_high() {
        assert!(EnableSwitch::new(MockInput(true), false).is_enabled());
        assert!(!EnableSwitch::new(MockInput(false), false).is_enabled());
    }

    #[test]
    fn test_active_low() {
        assert!(EnableSwitch::new(MockInput(false), true).is_enabled());
        assert!(!EnableSwitch::new(MockInput(true), true).is_enabled());
    }
}
