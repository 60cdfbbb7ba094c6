//! Boiler relay output
//!
//! Drives the burner relay (or an SSR) from a single GPIO.

use caldera_core::traits::HeaterOutput;
use caldera_hal::OutputPin;

/// Relay on a GPIO pin
///
/// Active-high by default. Relay boards with an optocoupler input are
/// usually active-low; construct those with `inverted = true`.
pub struct Relay<P> {
    pin: P,
    /// If true, relay closed = pin LOW
    inverted: bool,
    /// Logical state (true = relay closed, burner on)
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Create a relay output, initially open
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the relay
    /// - `inverted`: If true, the relay closes when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut relay = Self {
            pin,
            inverted,
            on: false,
        };
        relay.set_on(false);
        relay
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Give the pin back, opening the relay first
    pub fn release(mut self) -> P {
        self.set_on(false);
        self.pin
    }
}

impl<P: OutputPin> HeaterOutput for Relay<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        self.pin.set_state(on != self.inverted);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
