//! Caldera Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040 today). The core and driver crates only
//! ever talk to these traits, so the whole control path can be exercised
//! on the host with in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (caldera-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  caldera-core / caldera-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  caldera-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ caldera-hal-    │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`adc::AdcInput`] - Single-ended analog input
//! - [`eeprom::Eeprom`] - Byte-addressable persistent storage
//! - [`eeprom::SectorFlash`] - Erase-sector medium behind [`eeprom::MirroredEeprom`]

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod eeprom;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use adc::AdcInput;
pub use eeprom::{Eeprom, EepromError, MirroredEeprom, RamEeprom, SectorFlash};
pub use gpio::{InputPin, OutputPin};
