//! Boiler control
//!
//! [`Thermostat`] is the hysteresis/alarm state machine. [`Controller`]
//! wraps it together with parameter storage and diagnostics and is what
//! the firmware's control task drives.

mod command;
mod controller;
mod status;
mod thermostat;

pub use command::{Command, StatusSnapshot};
pub use controller::{Controller, TickReport};
pub use status::{AlarmKind, Status};
pub use thermostat::{ControlState, Thermostat};
