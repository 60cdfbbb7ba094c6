//! RP2040-specific HAL for the boiler thermostat firmware
//!
//! Implements the shared `caldera-hal` traits on top of `embassy-rp`:
//!
//! - GPIO output/input wrappers
//! - Blocking ADC channel
//! - Parameter storage emulated in the last flash sector

#![no_std]

pub mod adc;
pub mod eeprom;
pub mod gpio;

pub use adc::RpAdcChannel;
pub use eeprom::{flash_eeprom, FlashEeprom, ParameterSector};
pub use gpio::{RpInput, RpOutput};
