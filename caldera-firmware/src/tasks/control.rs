//! Boiler control task
//!
//! Ticks the controller at the board's sampling interval, drives the
//! relay and publishes the status. Commands from the panel are handled
//! between ticks as they arrive.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Delay, Duration, Ticker};

use caldera_core::control::{Command, Controller, TickReport};
use caldera_core::time::Millis;
use caldera_core::traits::Clock;
use caldera_drivers::relay::Relay;
use caldera_drivers::sensor::Thermistor;
use caldera_drivers::switch::EnableSwitch;
use caldera_hal_rp2040::{FlashEeprom, RpAdcChannel, RpInput, RpOutput};

use crate::board::TICK_INTERVAL_MS;
use crate::channels::{COMMANDS, STATUS};
use crate::clock::EmbassyClock;

/// Controller wired to the RP2040 peripherals
pub type BoilerController = Controller<
    'static,
    Thermistor<RpAdcChannel<'static>, Delay>,
    EnableSwitch<RpInput<'static>>,
    FlashEeprom<'static>,
>;

/// Burner relay
pub type BoilerRelay = Relay<RpOutput<'static>>;

/// Control task
#[embassy_executor::task]
pub async fn control_task(mut controller: BoilerController, mut relay: BoilerRelay) {
    info!("Control task started (tick {}ms)", TICK_INTERVAL_MS);

    let clock = EmbassyClock;
    let status = STATUS.sender();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));

    loop {
        match select(ticker.next(), COMMANDS.receive()).await {
            Either::First(()) => {
                let report = controller.tick(clock.now_ms());
                log_report(&report);
            }
            Either::Second(command) => {
                handle_command(&mut controller, command, clock.now_ms());
            }
        }

        controller.thermostat().apply(&mut relay);
        status.send(controller.snapshot(clock.now_ms()));
    }
}

fn log_report(report: &TickReport) {
    if let Some(kind) = report.raised {
        error!("ALARM: {} - relay held open until reset", kind.label());
    } else if report.status_changed {
        debug!("Status: {}", report.status.label());
    }

    if let Some(record) = report.diagnostic {
        info!("diag {}", record.to_line().as_str());
    }
}

fn handle_command(controller: &mut BoilerController, command: Command, now: Millis) {
    info!("Command: {:?}", command);

    if let Err(e) = controller.handle(command, now) {
        warn!("Parameter storage failed: {:?}", e);
        return;
    }

    match command {
        Command::Set(param, _) | Command::Adjust(param, _) => {
            debug!(
                "{:?} = {}",
                param,
                controller.thermostat().parameter(param)
            );
        }
        Command::Save => info!("Parameters saved"),
        _ => {}
    }
}
