//! Tunable control parameters
//!
//! The seven values the user can edit from the menu and that survive a
//! power cycle. Temperatures are °C × 100, durations are milliseconds.

/// Default requested boiler temperature (50.00°C)
pub const DEFAULT_REQUESTED_X100: i16 = 5000;
/// Default hysteresis band width (5.00°C)
pub const DEFAULT_HYSTERESIS_X100: i16 = 500;
/// Default low alarm threshold (0.00°C)
pub const DEFAULT_MIN_X100: i16 = 0;
/// Default high alarm threshold (85.00°C)
pub const DEFAULT_MAX_X100: i16 = 8500;
/// Default maximum continuous heating time (2 hours)
pub const DEFAULT_MAX_HEAT_MS: u32 = 7_200_000;
/// Default grace period after a heating cycle (2 minutes)
pub const DEFAULT_GRACE_MS: u32 = 120_000;
/// Default sensor offset (0.00°C)
pub const DEFAULT_OFFSET_X100: i16 = 0;

/// Identifies one editable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parameter {
    RequestedTemperature,
    Hysteresis,
    MinTemperature,
    MaxTemperature,
    MaxHeatDuration,
    GraceDuration,
    OffsetTemperature,
}

impl Parameter {
    /// All parameters, in menu order
    pub const ALL: [Parameter; 7] = [
        Parameter::RequestedTemperature,
        Parameter::Hysteresis,
        Parameter::MinTemperature,
        Parameter::MaxTemperature,
        Parameter::MaxHeatDuration,
        Parameter::GraceDuration,
        Parameter::OffsetTemperature,
    ];

    /// Increment applied by one button press
    pub const fn step(self) -> i32 {
        match self {
            Parameter::RequestedTemperature => 50,
            Parameter::Hysteresis => 50,
            Parameter::MinTemperature => 100,
            Parameter::MaxTemperature => 100,
            Parameter::MaxHeatDuration => 60_000,
            Parameter::GraceDuration => 60_000,
            Parameter::OffsetTemperature => 50,
        }
    }

    /// Inclusive range a setter will accept; values outside are clamped
    pub const fn bounds(self) -> (i32, i32) {
        match self {
            Parameter::RequestedTemperature => (0, 10_000),
            Parameter::Hysteresis => (0, 2_000),
            Parameter::MinTemperature => (-2_000, 10_000),
            Parameter::MaxTemperature => (0, 12_000),
            Parameter::MaxHeatDuration => (0, 86_400_000),
            Parameter::GraceDuration => (0, 3_600_000),
            Parameter::OffsetTemperature => (-1_000, 1_000),
        }
    }

    /// Clamp a value into this parameter's range
    pub fn clamp(self, value: i32) -> i32 {
        let (lo, hi) = self.bounds();
        value.clamp(lo, hi)
    }
}

/// Persisted control parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlParameters {
    /// Setpoint (°C × 100)
    pub requested_x100: i16,
    /// Full width of the dead band around the setpoint (°C × 100)
    pub hysteresis_x100: i16,
    /// Alarm below this temperature (°C × 100)
    pub min_x100: i16,
    /// Alarm above this temperature (°C × 100)
    pub max_x100: i16,
    /// Alarm when one heating cycle lasts longer than this (ms)
    pub max_heat_ms: u32,
    /// Idle time after a cycle before the relay may close again (ms)
    pub grace_ms: u32,
    /// Added to the interpolated temperature (°C × 100)
    pub offset_x100: i16,
}

impl Default for ControlParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ControlParameters {
    /// Factory defaults
    pub const DEFAULT: Self = Self {
        requested_x100: DEFAULT_REQUESTED_X100,
        hysteresis_x100: DEFAULT_HYSTERESIS_X100,
        min_x100: DEFAULT_MIN_X100,
        max_x100: DEFAULT_MAX_X100,
        max_heat_ms: DEFAULT_MAX_HEAT_MS,
        grace_ms: DEFAULT_GRACE_MS,
        offset_x100: DEFAULT_OFFSET_X100,
    };

    /// Read a parameter as a plain integer
    pub fn get(&self, param: Parameter) -> i32 {
        match param {
            Parameter::RequestedTemperature => self.requested_x100 as i32,
            Parameter::Hysteresis => self.hysteresis_x100 as i32,
            Parameter::MinTemperature => self.min_x100 as i32,
            Parameter::MaxTemperature => self.max_x100 as i32,
            Parameter::MaxHeatDuration => saturate_ms(self.max_heat_ms),
            Parameter::GraceDuration => saturate_ms(self.grace_ms),
            Parameter::OffsetTemperature => self.offset_x100 as i32,
        }
    }

    /// Write a parameter, clamped into its bounds
    ///
    /// Returns the value actually stored.
    pub fn set(&mut self, param: Parameter, value: i32) -> i32 {
        let value = param.clamp(value);

        // Bounds keep temperatures inside i16 and durations non-negative
        match param {
            Parameter::RequestedTemperature => self.requested_x100 = value as i16,
            Parameter::Hysteresis => self.hysteresis_x100 = value as i16,
            Parameter::MinTemperature => self.min_x100 = value as i16,
            Parameter::MaxTemperature => self.max_x100 = value as i16,
            Parameter::MaxHeatDuration => self.max_heat_ms = value as u32,
            Parameter::GraceDuration => self.grace_ms = value as u32,
            Parameter::OffsetTemperature => self.offset_x100 = value as i16,
        }

        value
    }

    /// Move a parameter by a number of UI steps (negative steps decrease)
    pub fn adjust(&mut self, param: Parameter, steps: i32) -> i32 {
        let delta = param.step().saturating_mul(steps);
        self.set(param, self.get(param).saturating_add(delta))
    }
}

fn saturate_ms(ms: u32) -> i32 {
    ms.min(i32::MAX as u32) as i32
}

/// Reset selection from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetMode {
    /// No reset requested
    #[default]
    No,
    /// Restart the controller, keeping stored parameters (clears an alarm)
    Normal,
    /// Wipe stored parameters, then restart with defaults
    Factory,
}

impl ResetMode {
    /// Cycle through the modes, wrapping in both directions
    pub fn cycle(self, steps: i32) -> Self {
        let index = (self as i32 + steps).rem_euclid(3);
        match index {
            0 => ResetMode::No,
            1 => ResetMode::Normal,
            _ => ResetMode::Factory,
        }
    }

    /// Menu label
    pub const fn label(self) -> &'static str {
        match self {
            ResetMode::No => "no",
            ResetMode::Normal => "normal",
            ResetMode::Factory => "factory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ControlParameters::default();
        assert_eq!(params.requested_x100, 5000);
        assert_eq!(params.hysteresis_x100, 500);
        assert_eq!(params.min_x100, 0);
        assert_eq!(params.max_x100, 8500);
        assert_eq!(params.max_heat_ms, 7_200_000);
        assert_eq!(params.grace_ms, 120_000);
        assert_eq!(params.offset_x100, 0);
    }

    #[test]
    fn test_defaults_within_bounds() {
        let params = ControlParameters::default();
        for param in Parameter::ALL {
            assert_eq!(param.clamp(params.get(param)), params.get(param));
        }
    }

    #[test]
    fn test_set_clamps() {
        let mut params = ControlParameters::default();

        assert_eq!(params.set(Parameter::Hysteresis, -50), 0);
        assert_eq!(params.hysteresis_x100, 0);

        assert_eq!(params.set(Parameter::MaxTemperature, 40_000), 12_000);
        assert_eq!(params.max_x100, 12_000);

        assert_eq!(params.set(Parameter::GraceDuration, -1), 0);
        assert_eq!(params.grace_ms, 0);
    }

    #[test]
    fn test_adjust_uses_step() {
        let mut params = ControlParameters::default();

        params.adjust(Parameter::RequestedTemperature, 2);
        assert_eq!(params.requested_x100, 5100);

        params.adjust(Parameter::MaxHeatDuration, -1);
        assert_eq!(params.max_heat_ms, 7_140_000);

        params.adjust(Parameter::OffsetTemperature, -100);
        assert_eq!(params.offset_x100, -1_000);
    }

    #[test]
    fn test_reset_mode_cycles_both_ways() {
        assert_eq!(ResetMode::No.cycle(1), ResetMode::Normal);
        assert_eq!(ResetMode::Factory.cycle(1), ResetMode::No);
        assert_eq!(ResetMode::No.cycle(-1), ResetMode::Factory);
        assert_eq!(ResetMode::Normal.cycle(-4), ResetMode::No);
    }
}
