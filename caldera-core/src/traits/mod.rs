//! Capability traits
//!
//! These traits define the interface between the control logic and the
//! environment it runs in. Each is injected, so tests substitute doubles.

pub mod clock;
pub mod heater;
pub mod input;

pub use clock::Clock;
pub use heater::{HeaterOutput, RawSensor, SensorError};
pub use input::EnableSignal;
