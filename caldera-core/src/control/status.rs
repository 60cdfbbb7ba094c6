//! Controller status codes
//!
//! What the status screen shows. Derived once per tick from the control
//! state; an alarm overrides everything and never clears by itself.

/// Types of alarm that latch the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmKind {
    /// Temperature fell below the minimum
    UnderTemperature,
    /// Temperature rose above the maximum
    OverTemperature,
    /// One heating cycle ran longer than the maximum heat duration
    HeatTimeout,
    /// The raw sensor reading could not be acquired
    SensorFault,
}

impl AlarmKind {
    /// Short label for the display
    pub const fn label(self) -> &'static str {
        match self {
            AlarmKind::UnderTemperature => "too cold",
            AlarmKind::OverTemperature => "too hot",
            AlarmKind::HeatTimeout => "heat timeout",
            AlarmKind::SensorFault => "sensor fault",
        }
    }
}

/// Controller status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Sample window not filled yet; temperature undefined
    Uninitialized,
    /// Enabled, not heating
    Ready,
    /// Enabled, heating, relay closed
    Heating,
    /// Enable input is off
    Disabled,
    /// Enabled and heating demanded, but still settling after the last cycle
    GracePeriod,
    /// Latched alarm; relay held open until restart
    Alarm(AlarmKind),
}

impl Status {
    /// Numeric status code
    pub const fn code(self) -> u8 {
        match self {
            Status::Ready => 0,
            Status::Heating => 1,
            Status::Disabled => 2,
            Status::GracePeriod => 3,
            Status::Alarm(_) => 4,
            Status::Uninitialized => 5,
        }
    }

    /// Label for the status screen
    pub const fn label(self) -> &'static str {
        match self {
            Status::Uninitialized => "starting",
            Status::Ready => "ready",
            Status::Heating => "heating",
            Status::Disabled => "disabled",
            Status::GracePeriod => "grace period",
            Status::Alarm(_) => "alarm",
        }
    }

    /// Check if this is an alarm status
    pub fn is_alarm(&self) -> bool {
        matches!(self, Status::Alarm(_))
    }

    /// Derive the status from the control flags
    ///
    /// Priority: grace period, heating, ready, disabled. Alarms are
    /// handled before this is reached.
    pub fn derive(enabled: bool, heating: bool, in_grace: bool) -> Self {
        match (enabled, heating, in_grace) {
            (true, true, true) => Status::GracePeriod,
            (true, true, false) => Status::Heating,
            (true, false, _) => Status::Ready,
            (false, _, _) => Status::Disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_priority() {
        assert_eq!(Status::derive(true, true, true), Status::GracePeriod);
        assert_eq!(Status::derive(true, true, false), Status::Heating);
        assert_eq!(Status::derive(true, false, true), Status::Ready);
        assert_eq!(Status::derive(true, false, false), Status::Ready);
    }

    #[test]
    fn test_disabled_overrides_heating() {
        for heating in [true, false] {
            for in_grace in [true, false] {
                assert_eq!(Status::derive(false, heating, in_grace), Status::Disabled);
            }
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        let statuses = [
            Status::Ready,
            Status::Heating,
            Status::Disabled,
            Status::GracePeriod,
            Status::Alarm(AlarmKind::OverTemperature),
            Status::Uninitialized,
        ];

        for (i, a) in statuses.iter().enumerate() {
            for b in &statuses[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Status::Ready.label(), "ready");
        assert_eq!(Status::GracePeriod.label(), "grace period");
        assert!(Status::Alarm(AlarmKind::HeatTimeout).is_alarm());
        assert!(!Status::Heating.is_alarm());
    }
}
