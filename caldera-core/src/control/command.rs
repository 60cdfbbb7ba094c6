//! Requests from the user interface and what it reads back

use crate::params::{ControlParameters, Parameter, ResetMode};
use crate::time::Millis;

use super::status::{AlarmKind, Status};

/// Request sent to the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set a parameter to an absolute value (clamped)
    Set(Parameter, i32),
    /// Move a parameter by a number of UI steps
    Adjust(Parameter, i32),
    /// Write the current parameters to persistent storage
    Save,
    /// Restart or factory reset
    Reset(ResetMode),
    /// Turn the diagnostic stream on or off
    Diagnostics(bool),
}

/// Read-only view published after every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub status: Status,
    /// Temperature (°C × 100), `None` while starting
    pub temperature_x100: Option<i32>,
    /// Relay command
    pub relay_on: bool,
    pub alarm: Option<AlarmKind>,
    /// Time the current status has been shown (ms)
    pub since_status_change_ms: Millis,
    pub parameters: ControlParameters,
}
