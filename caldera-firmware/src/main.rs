//! Caldera - Boiler Thermostat Firmware
//!
//! Main firmware binary for RP2040-based boiler controllers. Reads the
//! boiler thermistor, switches the burner relay with hysteresis, and
//! latches an alarm on any out-of-range condition.
//!
//! Named after the volcanic cauldron: a vessel of heat that has to be
//! kept in check.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use caldera_core::control::Controller;
use caldera_core::storage::LoadOutcome;
use caldera_core::telemetry::Diagnostics;
use caldera_core::traits::Clock;
use caldera_drivers::relay::Relay;
use caldera_drivers::sensor::Thermistor;
use caldera_drivers::switch::EnableSwitch;
use caldera_hal_rp2040::{flash_eeprom, RpAdcChannel, RpInput, RpOutput};

use crate::board::*;
use crate::channels::STATUS;
use crate::clock::EmbassyClock;

#[macro_use]
mod board;
mod channels;
mod clock;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Caldera firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let clock = EmbassyClock;

    // Relay first, so the burner is held off through the rest of start-up
    let relay_off = if RELAY_INVERTED { Level::High } else { Level::Low };
    let relay = Relay::new(
        RpOutput::new(Output::new(relay_pin!(p), relay_off)),
        RELAY_INVERTED,
    );

    let adc = Adc::new_blocking(p.ADC, Default::default());
    let channel = Channel::new_pin(thermistor_pin!(p), Pull::None);
    let sensor = Thermistor::new(RpAdcChannel::new(adc, channel), Delay, SETTLE_MS);

    let enable_pull = if ENABLE_INVERTED { Pull::Up } else { Pull::Down };
    let enable = EnableSwitch::new(
        RpInput::new(Input::new(enable_pin!(p), enable_pull)),
        ENABLE_INVERTED,
    );

    let reset_button = Input::new(reset_pin!(p), Pull::Up);

    info!("ADC, relay and inputs initialized");

    // Load parameters from flash (or restore defaults)
    let eeprom = unwrap!(flash_eeprom(p.FLASH));
    let now = clock.now_ms();
    let (controller, outcome) = Controller::start(
        sensor,
        enable,
        CALIBRATION,
        eeprom,
        Diagnostics::new(DIAGNOSTICS_ENABLED, DIAGNOSTICS_INTERVAL_MS, now),
        now,
    );

    match outcome {
        LoadOutcome::Loaded => info!("Parameters loaded from flash"),
        LoadOutcome::Restored => warn!("No valid parameters in flash, defaults restored"),
        LoadOutcome::RestoreFailed(e) => {
            warn!("No valid parameters in flash, writing defaults failed: {:?}", e)
        }
    }

    let params = controller.thermostat().parameters();
    info!(
        "Setpoint {}, hysteresis {}, limits {}..{} (x100 C)",
        params.requested_x100, params.hysteresis_x100, params.min_x100, params.max_x100
    );

    // Spawn tasks
    spawner
        .spawn(tasks::control_task(controller, relay))
        .unwrap();
    spawner
        .spawn(tasks::reset_button_task(reset_button))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    let mut status_rx = STATUS.anon_receiver();
    loop {
        embassy_time::Timer::after_secs(60).await;
        if let Some(status) = status_rx.try_get() {
            trace!(
                "Heartbeat: {} temp={:?} relay={}",
                status.status.label(),
                status.temperature_x100,
                status.relay_on
            );
        }
    }
}
