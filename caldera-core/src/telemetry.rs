//! Diagnostic records
//!
//! While diagnostics are enabled the firmware emits one line per
//! reporting interval for offline analysis. Fields, in order:
//!
//! ```text
//! uptime_s;temperature;requested;hysteresis;heating;enabled;grace;
//! last_heat_start_s;last_heat_end_s;last_status_change_s;alarm
//! ```
//!
//! Temperatures print with two decimals, flags as `0`/`1`, times as whole
//! seconds since start. An undefined temperature is an empty field.

use core::fmt::{self, Write};

use heapless::String;

use crate::control::ControlState;
use crate::params::ControlParameters;
use crate::time::{elapsed, Millis};

/// Capacity of a formatted diagnostic line
pub const LINE_CAPACITY: usize = 128;

/// Default minimum time between two reports (ms)
pub const DEFAULT_REPORT_INTERVAL_MS: Millis = 1_000;

/// One diagnostic sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagnosticRecord {
    pub uptime_s: u32,
    pub temperature_x100: Option<i32>,
    pub requested_x100: i16,
    pub hysteresis_x100: i16,
    pub heating: bool,
    pub enabled: bool,
    pub in_grace: bool,
    pub last_heat_start_s: u32,
    pub last_heat_end_s: u32,
    pub last_status_change_s: u32,
    pub alarm: bool,
}

impl DiagnosticRecord {
    /// Build a record from the control state
    ///
    /// All times are relative to `started_at`.
    pub fn capture(
        started_at: Millis,
        now: Millis,
        state: &ControlState,
        params: &ControlParameters,
    ) -> Self {
        let secs = |t: Millis| elapsed(started_at, t) / 1000;

        Self {
            uptime_s: secs(now),
            temperature_x100: state.temperature_x100,
            requested_x100: params.requested_x100,
            hysteresis_x100: params.hysteresis_x100,
            heating: state.heating,
            enabled: state.enabled,
            in_grace: state.in_grace,
            last_heat_start_s: secs(state.last_heat_start),
            last_heat_end_s: secs(state.last_heat_end),
            last_status_change_s: secs(state.last_status_change),
            alarm: state.alarm.is_some(),
        }
    }

    /// Format into a fixed-capacity line
    pub fn to_line(&self) -> String<LINE_CAPACITY> {
        let mut line = String::new();
        // Longest possible record is well under the capacity
        let _ = write!(line, "{}", self);
        line
    }
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.uptime_s)?;
        if let Some(temp) = self.temperature_x100 {
            write!(f, "{}", Centi(temp))?;
        }
        write!(
            f,
            ";{};{};{};{};{};{};{};{};{}",
            Centi(self.requested_x100 as i32),
            Centi(self.hysteresis_x100 as i32),
            flag(self.heating),
            flag(self.enabled),
            flag(self.in_grace),
            self.last_heat_start_s,
            self.last_heat_end_s,
            self.last_status_change_s,
            flag(self.alarm),
        )
    }
}

/// Fixed-point hundredths printed as a decimal
struct Centi(i32);

impl fmt::Display for Centi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

fn flag(value: bool) -> u8 {
    value as u8
}

/// Report rate limiter
#[derive(Debug, Clone)]
pub struct Diagnostics {
    enabled: bool,
    interval_ms: Millis,
    started_at: Millis,
    /// `None` means a report is due on the next poll
    last_report: Option<Millis>,
}

impl Diagnostics {
    /// Create a limiter
    ///
    /// `started_at` is the zero point for every time in the records.
    pub fn new(enabled: bool, interval_ms: Millis, started_at: Millis) -> Self {
        Self {
            enabled,
            interval_ms,
            started_at,
            last_report: None,
        }
    }

    /// Turn reporting on or off
    ///
    /// Turning it on makes the next poll report immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.last_report = None;
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_ms(&self) -> Millis {
        self.interval_ms
    }

    /// Produce a record if reporting is on and the interval has passed
    pub fn poll(
        &mut self,
        now: Millis,
        state: &ControlState,
        params: &ControlParameters,
    ) -> Option<DiagnosticRecord> {
        if !self.enabled {
            return None;
        }

        if let Some(last) = self.last_report {
            if elapsed(last, now) < self.interval_ms {
                return None;
            }
        }

        self.last_report = Some(now);
        Some(DiagnosticRecord::capture(self.started_at, now, state, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::AlarmKind;

    fn record() -> DiagnosticRecord {
        DiagnosticRecord {
            uptime_s: 3_600,
            temperature_x100: Some(4_725),
            requested_x100: 5_000,
            hysteresis_x100: 500,
            heating: true,
            enabled: true,
            in_grace: false,
            last_heat_start_s: 3_500,
            last_heat_end_s: 120,
            last_status_change_s: 3_500,
            alarm: false,
        }
    }

    #[test]
    fn test_line_format() {
        assert_eq!(
            record().to_line().as_str(),
            "3600;47.25;50.00;5.00;1;1;0;3500;120;3500;0"
        );
    }

    #[test]
    fn test_undefined_temperature_is_empty_field() {
        let rec = DiagnosticRecord {
            temperature_x100: None,
            ..record()
        };
        assert!(rec.to_line().starts_with("3600;;50.00;"));
    }

    #[test]
    fn test_negative_temperature() {
        let rec = DiagnosticRecord {
            temperature_x100: Some(-5),
            ..record()
        };
        assert!(rec.to_line().starts_with("3600;-0.05;"));
    }

    #[test]
    fn test_capture_relative_to_start() {
        let mut state = ControlState::new(10_000);
        state.temperature_x100 = Some(6_000);
        state.last_heat_end = 15_500;
        state.alarm = Some(AlarmKind::OverTemperature);

        let rec = DiagnosticRecord::capture(10_000, 72_000, &state, &ControlParameters::default());
        assert_eq!(rec.uptime_s, 62);
        assert_eq!(rec.last_heat_start_s, 0);
        assert_eq!(rec.last_heat_end_s, 5);
        assert!(rec.alarm);
    }

    #[test]
    fn test_poll_rate_limits() {
        let state = ControlState::new(0);
        let params = ControlParameters::default();
        let mut diag = Diagnostics::new(true, 1_000, 0);

        assert!(diag.poll(0, &state, &params).is_some());
        assert!(diag.poll(999, &state, &params).is_none());
        assert!(diag.poll(1_000, &state, &params).is_some());
    }

    #[test]
    fn test_poll_disabled() {
        let state = ControlState::new(0);
        let params = ControlParameters::default();
        let mut diag = Diagnostics::new(false, 1_000, 0);

        assert!(diag.poll(5_000, &state, &params).is_none());

        diag.set_enabled(true);
        assert!(diag.poll(5_001, &state, &params).is_some());
        assert!(diag.poll(5_002, &state, &params).is_none());
    }
}
