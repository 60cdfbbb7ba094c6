//! Hysteresis thermostat with latching alarms
//!
//! One `tick` per sampling interval: read the sensor, fold the reading into
//! the rolling average, convert to temperature, then run the on/off
//! decision and the safety checks. The relay command is [`Thermostat::should_heat`].
//!
//! Heating starts below `requested - hysteresis/2` and stops above
//! `requested + hysteresis/2`; both bounds are exclusive. Any alarm latches:
//! heating is forced off and stays off until [`Thermostat::restart`].
//! An alarmed thermostat keeps sampling so the display still shows the
//! boiler temperature, but no control decision is taken.

use crate::calibration::CalibrationTable;
use crate::params::{ControlParameters, Parameter};
use crate::sampling::{SampleBuffer, SAMPLE_SET_SIZE};
use crate::time::{elapsed, Millis};
use crate::traits::{Clock, EnableSignal, HeaterOutput, RawSensor};

use super::status::{AlarmKind, Status};

/// Transient control state
///
/// Rebuilt from scratch on every restart; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    /// Last computed temperature (°C × 100), `None` until the sample window fills
    pub temperature_x100: Option<i32>,
    /// Hysteresis decision: below the band and not yet back above it
    pub heating: bool,
    /// Last sampled enable input
    pub enabled: bool,
    /// Still inside the grace period after the last completed cycle
    pub in_grace: bool,
    /// Latched alarm, if any
    pub alarm: Option<AlarmKind>,
    /// Current status
    pub status: Status,
    /// When the current or last heating cycle started
    pub last_heat_start: Millis,
    /// When the last heating cycle ended
    pub last_heat_end: Millis,
    /// When `status` last changed
    pub last_status_change: Millis,
}

impl ControlState {
    /// Fresh state; every timestamp starts at `now`
    pub const fn new(now: Millis) -> Self {
        Self {
            temperature_x100: None,
            heating: false,
            enabled: false,
            in_grace: false,
            alarm: None,
            status: Status::Uninitialized,
            last_heat_start: now,
            last_heat_end: now,
            last_status_change: now,
        }
    }
}

/// On/off boiler controller
///
/// Owns its collaborators, parameters and state. Nothing outside the
/// thermostat mutates them except through the methods below.
pub struct Thermostat<'t, S, E, const N: usize = SAMPLE_SET_SIZE> {
    sensor: S,
    enable: E,
    table: CalibrationTable<'t>,
    params: ControlParameters,
    samples: SampleBuffer<N>,
    state: ControlState,
}

impl<'t, S: RawSensor, E: EnableSignal, const N: usize> Thermostat<'t, S, E, N> {
    /// Create a thermostat
    ///
    /// # Arguments
    /// - `sensor`: Raw thermistor reading
    /// - `enable`: External enable input
    /// - `table`: Calibration for `sensor`
    /// - `params`: Parameters, normally from the persistent store
    /// - `now`: Current time, used as the initial value of every timestamp
    pub fn new(
        sensor: S,
        enable: E,
        table: CalibrationTable<'t>,
        params: ControlParameters,
        now: Millis,
    ) -> Self {
        Self {
            sensor,
            enable,
            table,
            params,
            samples: SampleBuffer::new(),
            state: ControlState::new(now),
        }
    }

    /// Run one sampling and evaluation step
    ///
    /// Returns the status after the step.
    pub fn tick(&mut self, now: Millis) -> Status {
        let raw = match self.sensor.read_raw() {
            Ok(raw) => raw,
            Err(_) => {
                self.latch(AlarmKind::SensorFault, now);
                return self.state.status;
            }
        };

        self.samples.push(raw);
        let Some(average) = self.samples.average() else {
            return self.state.status;
        };

        let temp = self
            .table
            .interpolate(average)
            .saturating_add(self.params.offset_x100 as i32);
        self.state.temperature_x100 = Some(temp);

        if self.state.alarm.is_some() {
            return self.state.status;
        }

        self.state.enabled = self.enable.is_enabled();
        self.state.in_grace = elapsed(self.state.last_heat_end, now) <= self.params.grace_ms;

        self.update_heating(temp, now);

        if let Some(kind) = self.check_alarms(temp, now) {
            self.latch(kind, now);
            return self.state.status;
        }

        let status = Status::derive(self.state.enabled, self.state.heating, self.state.in_grace);
        self.set_status(status, now);
        status
    }

    /// Run one step at the time reported by `clock`
    pub fn sample(&mut self, clock: &impl Clock) -> Status {
        self.tick(clock.now_ms())
    }

    fn update_heating(&mut self, temp: i32, now: Millis) {
        let requested = self.params.requested_x100 as i32;
        let half_band = self.params.hysteresis_x100 as i32 / 2;

        if !self.state.heating && temp < requested - half_band {
            self.state.heating = true;
            self.state.last_heat_start = now;
        } else if self.state.heating && temp > requested + half_band {
            self.state.heating = false;
            if !self.state.in_grace {
                self.state.last_heat_end = now;
            }
        }
    }

    fn check_alarms(&self, temp: i32, now: Millis) -> Option<AlarmKind> {
        if temp < self.params.min_x100 as i32 {
            return Some(AlarmKind::UnderTemperature);
        }

        if temp > self.params.max_x100 as i32 {
            return Some(AlarmKind::OverTemperature);
        }

        if self.state.heating
            && elapsed(self.state.last_heat_start, now) > self.params.max_heat_ms
        {
            return Some(AlarmKind::HeatTimeout);
        }

        None
    }

    /// Latch an alarm; the first alarm wins
    fn latch(&mut self, kind: AlarmKind, now: Millis) {
        if self.state.alarm.is_some() {
            return;
        }

        self.state.alarm = Some(kind);
        self.state.heating = false;
        self.set_status(Status::Alarm(kind), now);
    }

    fn set_status(&mut self, status: Status, now: Millis) {
        if status != self.state.status {
            self.state.status = status;
            self.state.last_status_change = now;
        }
    }

    /// Rebuild the control state as if freshly constructed
    ///
    /// Clears a latched alarm and the sample window. Parameters are kept.
    pub fn restart(&mut self, now: Millis) {
        self.samples.clear();
        self.state = ControlState::new(now);
    }

    /// Relay command: heating demanded, enabled, settled and not alarmed
    pub fn should_heat(&self) -> bool {
        self.state.heating
            && self.state.enabled
            && !self.state.in_grace
            && self.state.alarm.is_none()
    }

    /// Drive a heater output from [`Self::should_heat`]
    pub fn apply(&self, output: &mut impl HeaterOutput) {
        let on = self.should_heat();
        if output.is_on() != on {
            output.set_on(on);
        }
    }

    /// Snapshot of the control state
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Current temperature (°C × 100), `None` until the window fills
    pub fn temperature_x100(&self) -> Option<i32> {
        self.state.temperature_x100
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.state.status
    }

    /// Latched alarm, if any
    pub fn alarm(&self) -> Option<AlarmKind> {
        self.state.alarm
    }

    pub fn is_alarmed(&self) -> bool {
        self.state.alarm.is_some()
    }

    pub fn is_heating(&self) -> bool {
        self.state.heating
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn in_grace_period(&self) -> bool {
        self.state.in_grace
    }

    /// How long the current status has been shown
    pub fn time_since_status_change(&self, now: Millis) -> Millis {
        elapsed(self.state.last_status_change, now)
    }

    /// Copy of the current parameters
    pub fn parameters(&self) -> ControlParameters {
        self.params
    }

    /// Read one parameter
    pub fn parameter(&self, param: Parameter) -> i32 {
        self.params.get(param)
    }

    /// Set one parameter, clamped; returns the stored value
    ///
    /// Takes effect on the next tick.
    pub fn set_parameter(&mut self, param: Parameter, value: i32) -> i32 {
        self.params.set(param, value)
    }

    /// Move one parameter by `steps` UI increments; returns the stored value
    pub fn adjust(&mut self, param: Parameter, steps: i32) -> i32 {
        self.params.adjust(param, steps)
    }

    /// Replace all parameters verbatim, e.g. after reloading from storage
    pub fn replace_parameters(&mut self, params: ControlParameters) {
        self.params = params;
    }

    pub fn set_requested_temperature(&mut self, x100: i32) -> i32 {
        self.set_parameter(Parameter::RequestedTemperature, x100)
    }

    pub fn set_hysteresis(&mut self, x100: i32) -> i32 {
        self.set_parameter(Parameter::Hysteresis, x100)
    }

    pub fn set_min_temperature(&mut self, x100: i32) -> i32 {
        self.set_parameter(Parameter::MinTemperature, x100)
    }

    pub fn set_max_temperature(&mut self, x100: i32) -> i32 {
        self.set_parameter(Parameter::MaxTemperature, x100)
    }

    pub fn set_max_heat_duration(&mut self, ms: u32) -> u32 {
        self.set_parameter(Parameter::MaxHeatDuration, clamp_ms(ms)) as u32
    }

    pub fn set_grace_duration(&mut self, ms: u32) -> u32 {
        self.set_parameter(Parameter::GraceDuration, clamp_ms(ms)) as u32
    }

    pub fn set_offset_temperature(&mut self, x100: i32) -> i32 {
        self.set_parameter(Parameter::OffsetTemperature, x100)
    }

    /// Get access to the underlying sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Get access to the underlying enable input
    pub fn enable(&self) -> &E {
        &self.enable
    }

    pub fn enable_mut(&mut self) -> &mut E {
        &mut self.enable
    }
}

fn clamp_ms(ms: u32) -> i32 {
    ms.min(i32::MAX as u32) as i32
}
