//! Board-agnostic core logic for the boiler thermostat firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Capability traits for the sensor, enable input, clock and relay
//! - Calibration table and fixed-point interpolation
//! - Rolling sample averaging
//! - Wraparound-safe elapsed time
//! - The hysteresis/alarm control state machine
//! - Parameter definitions and their persisted record format
//! - Diagnostic records
//!
//! All temperatures are fixed-point hundredths of a degree Celsius
//! (`_x100`), all durations and timestamps are milliseconds.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod calibration;
pub mod control;
pub mod params;
pub mod sampling;
pub mod storage;
pub mod telemetry;
pub mod time;
pub mod traits;
