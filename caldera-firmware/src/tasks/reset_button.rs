//! Alarm reset button
//!
//! A press restarts the thermostat, which is the only way out of a
//! latched alarm. Stored parameters are kept.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use caldera_core::control::Command;
use caldera_core::params::ResetMode;

use crate::channels::COMMANDS;

/// Contact bounce settles well within this (ms)
const DEBOUNCE_MS: u64 = 50;

/// Reset button task (active low)
#[embassy_executor::task]
pub async fn reset_button_task(mut button: Input<'static>) {
    info!("Reset button task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        if button.is_low() {
            info!("Reset button pressed");
            COMMANDS.send(Command::Reset(ResetMode::Normal)).await;
        }

        button.wait_for_high().await;
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}
