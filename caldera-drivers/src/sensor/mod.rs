//! Temperature sensors

pub mod thermistor;

pub use thermistor::{Thermistor, DEFAULT_SETTLE_MS};
