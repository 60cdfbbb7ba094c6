//! Board configuration
//!
//! Constants and pin macros are generated by build.rs from boiler.toml.
//! Each `*_pin!(p)` macro moves the configured pin out of the peripherals.

use caldera_core::calibration::{Breakpoint, CalibrationTable};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// Thermistor calibration for this board
pub const CALIBRATION: CalibrationTable<'static> = CalibrationTable::new(CALIBRATION_POINTS);
