//! Thermostat plus its persistence and diagnostics

use caldera_hal::eeprom::Eeprom;

use crate::calibration::CalibrationTable;
use crate::params::ResetMode;
use crate::sampling::SAMPLE_SET_SIZE;
use crate::storage::{LoadOutcome, ParameterStore, StorageError};
use crate::telemetry::{DiagnosticRecord, Diagnostics};
use crate::time::Millis;
use crate::traits::{EnableSignal, RawSensor};

use super::command::{Command, StatusSnapshot};
use super::status::{AlarmKind, Status};
use super::thermostat::Thermostat;

/// Outcome of one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub status: Status,
    /// Status differs from the previous tick
    pub status_changed: bool,
    /// Alarm latched during this tick
    pub raised: Option<AlarmKind>,
    /// Diagnostic record, when one is due
    pub diagnostic: Option<DiagnosticRecord>,
}

/// Everything the control task owns
pub struct Controller<'t, S, E, M, const N: usize = SAMPLE_SET_SIZE> {
    thermostat: Thermostat<'t, S, E, N>,
    store: ParameterStore<M>,
    diagnostics: Diagnostics,
}

impl<'t, S, E, M, const N: usize> Controller<'t, S, E, M, N>
where
    S: RawSensor,
    E: EnableSignal,
    M: Eeprom,
{
    /// Load the parameters and build the thermostat
    ///
    /// Returns the load outcome so the caller can report a restore.
    pub fn start(
        sensor: S,
        enable: E,
        table: CalibrationTable<'t>,
        eeprom: M,
        diagnostics: Diagnostics,
        now: Millis,
    ) -> (Self, LoadOutcome) {
        let mut store = ParameterStore::new(eeprom);
        let (params, outcome) = store.load();

        let controller = Self {
            thermostat: Thermostat::new(sensor, enable, table, params, now),
            store,
            diagnostics,
        };

        (controller, outcome)
    }

    /// Run one thermostat step and poll the diagnostics
    pub fn tick(&mut self, now: Millis) -> TickReport {
        let before = self.thermostat.status();
        let was_alarmed = self.thermostat.is_alarmed();

        let status = self.thermostat.tick(now);

        let raised = if was_alarmed {
            None
        } else {
            self.thermostat.alarm()
        };

        let params = self.thermostat.parameters();
        let diagnostic = self
            .diagnostics
            .poll(now, self.thermostat.state(), &params);

        TickReport {
            status,
            status_changed: status != before,
            raised,
            diagnostic,
        }
    }

    /// Apply a user request
    ///
    /// Only `Save` and a factory reset touch storage, and only they can fail.
    /// A factory reset always leaves the thermostat restarted on defaults,
    /// even when writing them back to storage failed.
    pub fn handle(&mut self, command: Command, now: Millis) -> Result<(), StorageError> {
        match command {
            Command::Set(param, value) => {
                self.thermostat.set_parameter(param, value);
            }
            Command::Adjust(param, steps) => {
                self.thermostat.adjust(param, steps);
            }
            Command::Save => {
                self.store.save(&self.thermostat.parameters())?;
            }
            Command::Reset(ResetMode::No) => {}
            Command::Reset(ResetMode::Normal) => {
                self.thermostat.restart(now);
            }
            Command::Reset(ResetMode::Factory) => {
                self.store.factory_reset()?;
                let (params, outcome) = self.store.load();
                self.thermostat.replace_parameters(params);
                self.thermostat.restart(now);

                if let LoadOutcome::RestoreFailed(e) = outcome {
                    return Err(e);
                }
            }
            Command::Diagnostics(enabled) => {
                self.diagnostics.set_enabled(enabled);
            }
        }

        Ok(())
    }

    /// View for the display and menu
    pub fn snapshot(&self, now: Millis) -> StatusSnapshot {
        StatusSnapshot {
            status: self.thermostat.status(),
            temperature_x100: self.thermostat.temperature_x100(),
            relay_on: self.thermostat.should_heat(),
            alarm: self.thermostat.alarm(),
            since_status_change_ms: self.thermostat.time_since_status_change(now),
            parameters: self.thermostat.parameters(),
        }
    }

    pub fn thermostat(&self) -> &Thermostat<'t, S, E, N> {
        &self.thermostat
    }

    pub fn thermostat_mut(&mut self) -> &mut Thermostat<'t, S, E, N> {
        &mut self.thermostat
    }

    pub fn store(&self) -> &ParameterStore<M> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore<M> {
        &mut self.store
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Breakpoint;
    use crate::params::{ControlParameters, Parameter};
    use crate::storage::{encode, RECORD_LEN};
    use crate::traits::SensorError;
    use caldera_hal::eeprom::{EepromError, RamEeprom};

    const IDENTITY_POINTS: &[Breakpoint] = &[Breakpoint::new(0, 0), Breakpoint::new(1_000, 10)];
    const IDENTITY: CalibrationTable<'static> = CalibrationTable::new(IDENTITY_POINTS);

    struct MockSensor(u16);

    impl RawSensor for MockSensor {
        fn read_raw(&mut self) -> Result<u16, SensorError> {
            Ok(self.0)
        }
    }

    struct AlwaysOn;

    impl EnableSignal for AlwaysOn {
        fn is_enabled(&mut self) -> bool {
            true
        }
    }

    /// RAM region whose writes can be made to fail
    struct FlakyEeprom {
        inner: RamEeprom<64>,
        fail_writes: bool,
    }

    impl Eeprom for FlakyEeprom {
        fn capacity(&self) -> usize {
            self.inner.capacity()
        }

        fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
            self.inner.read(offset, buffer)
        }

        fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
            if self.fail_writes {
                return Err(EepromError::Flash);
            }
            self.inner.write(offset, data)
        }

        fn erase_all(&mut self) -> Result<(), EepromError> {
            self.inner.erase_all()
        }
    }

    type TestController = Controller<'static, MockSensor, AlwaysOn, RamEeprom<64>, 1>;

    fn start(eeprom: RamEeprom<64>) -> (TestController, LoadOutcome) {
        Controller::start(
            MockSensor(4_000),
            AlwaysOn,
            IDENTITY,
            eeprom,
            Diagnostics::new(false, 1_000, 0),
            0,
        )
    }

    #[test]
    fn test_start_on_blank_storage_restores_defaults() {
        let (controller, outcome) = start(RamEeprom::new());

        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(
            controller.thermostat().parameters(),
            ControlParameters::default()
        );
    }

    #[test]
    fn test_save_persists_edits() {
        let (mut controller, _) = start(RamEeprom::new());

        controller
            .handle(Command::Set(Parameter::RequestedTemperature, 6_000), 1)
            .unwrap();
        controller
            .handle(Command::Adjust(Parameter::Hysteresis, 2), 1)
            .unwrap();
        controller.handle(Command::Save, 2).unwrap();

        let stored = &controller.store().eeprom().as_bytes()[..RECORD_LEN];
        assert_eq!(stored, &encode(&controller.thermostat().parameters()));

        let params = controller.thermostat().parameters();
        assert_eq!(params.requested_x100, 6_000);
        assert_eq!(params.hysteresis_x100, 600);
    }

    #[test]
    fn test_unsaved_edit_not_persisted() {
        let (mut controller, _) = start(RamEeprom::new());
        controller
            .handle(Command::Set(Parameter::RequestedTemperature, 6_000), 1)
            .unwrap();

        let stored = &controller.store().eeprom().as_bytes()[..RECORD_LEN];
        assert_eq!(stored, &encode(&ControlParameters::default()));
    }

    #[test]
    fn test_tick_reports_alarm_once() {
        let (mut controller, _) = start(RamEeprom::new());
        controller.thermostat_mut().sensor_mut().0 = 9_000;

        let report = controller.tick(5_000);
        assert_eq!(report.raised, Some(AlarmKind::OverTemperature));
        assert!(report.status_changed);

        let report = controller.tick(6_000);
        assert_eq!(report.raised, None);
        assert!(!report.status_changed);
        assert!(report.status.is_alarm());
    }

    #[test]
    fn test_normal_reset_clears_alarm_keeps_parameters() {
        let (mut controller, _) = start(RamEeprom::new());
        controller
            .handle(Command::Set(Parameter::MaxTemperature, 3_000), 0)
            .unwrap();

        controller.tick(1_000);
        assert!(controller.thermostat().is_alarmed());

        controller
            .handle(Command::Reset(ResetMode::Normal), 2_000)
            .unwrap();
        assert!(!controller.thermostat().is_alarmed());
        assert_eq!(controller.thermostat().parameters().max_x100, 3_000);
    }

    #[test]
    fn test_factory_reset_restores_defaults() {
        let (mut controller, _) = start(RamEeprom::new());
        controller
            .handle(Command::Set(Parameter::GraceDuration, 0), 0)
            .unwrap();
        controller.handle(Command::Save, 0).unwrap();

        controller
            .handle(Command::Reset(ResetMode::Factory), 1_000)
            .unwrap();

        assert_eq!(
            controller.thermostat().parameters(),
            ControlParameters::default()
        );
        let stored = &controller.store().eeprom().as_bytes()[..RECORD_LEN];
        assert_eq!(stored, &encode(&ControlParameters::default()));
        assert_eq!(controller.thermostat().status(), Status::Uninitialized);
    }

    #[test]
    fn test_factory_reset_reports_failed_write_back() {
        let eeprom = FlakyEeprom {
            inner: RamEeprom::new(),
            fail_writes: false,
        };
        let (mut controller, outcome) = Controller::<_, _, _, 1>::start(
            MockSensor(4_000),
            AlwaysOn,
            IDENTITY,
            eeprom,
            Diagnostics::new(false, 1_000, 0),
            0,
        );
        assert_eq!(outcome, LoadOutcome::Restored);

        controller
            .handle(Command::Set(Parameter::RequestedTemperature, 6_000), 0)
            .unwrap();
        controller.store_mut().eeprom_mut().fail_writes = true;

        let result = controller.handle(Command::Reset(ResetMode::Factory), 1_000);
        assert_eq!(result, Err(StorageError::Eeprom(EepromError::Flash)));

        // Running on defaults regardless, storage left zeroed
        assert_eq!(
            controller.thermostat().parameters(),
            ControlParameters::default()
        );
        assert_eq!(controller.thermostat().status(), Status::Uninitialized);
        let stored = controller.store().eeprom().inner.as_bytes();
        assert!(stored.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_diagnostics_toggle() {
        let (mut controller, _) = start(RamEeprom::new());
        assert!(controller.tick(1_000).diagnostic.is_none());

        controller.handle(Command::Diagnostics(true), 1_000).unwrap();
        let record = controller.tick(2_000).diagnostic.unwrap();
        assert_eq!(record.uptime_s, 2);
        assert_eq!(record.temperature_x100, Some(4_000));
    }

    #[test]
    fn test_snapshot() {
        let (mut controller, _) = start(RamEeprom::new());
        controller
            .handle(Command::Set(Parameter::GraceDuration, 0), 0)
            .unwrap();
        controller.tick(1_000);

        let snap = controller.snapshot(4_000);
        assert_eq!(snap.status, Status::Heating);
        assert_eq!(snap.temperature_x100, Some(4_000));
        assert!(snap.relay_on);
        assert_eq!(snap.since_status_change_ms, 3_000);
    }

    #[test]
    fn test_save_failure_surfaces() {
        let (mut controller, outcome) = Controller::<_, _, _, 1>::start(
            MockSensor(4_000),
            AlwaysOn,
            IDENTITY,
            RamEeprom::<8>::new(),
            Diagnostics::new(false, 1_000, 0),
            0,
        );

        assert!(matches!(outcome, LoadOutcome::RestoreFailed(_)));
        assert!(controller.handle(Command::Save, 0).is_err());
    }
}
