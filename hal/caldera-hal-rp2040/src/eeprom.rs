//! Flash-backed EEPROM emulation for RP2040
//!
//! The parameter region lives at the start of the last 4 KB erase sector
//! of the on-board flash. [`MirroredEeprom`] keeps a RAM mirror of the
//! region; every write erases the sector and programs the whole image.
//!
//! Flash endurance is around 100k erase cycles per sector. Writes only
//! happen on an explicit save or factory reset, never from the control
//! loop.

use caldera_hal::eeprom::{EepromError, MirroredEeprom, SectorFlash};
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
/// Bytes exposed as EEPROM
pub const REGION_SIZE: usize = 256;
/// Offset of the parameter sector
pub const REGION_START: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Parameter storage in the last flash sector
pub type FlashEeprom<'d> = MirroredEeprom<ParameterSector<'d>, REGION_SIZE>;

/// Take the flash peripheral and load the parameter region into RAM
pub fn flash_eeprom(flash: Peri<'_, FLASH>) -> Result<FlashEeprom<'_>, EepromError> {
    MirroredEeprom::new(ParameterSector {
        flash: Flash::new_blocking(flash),
    })
}

/// The last erase sector of the on-board flash
pub struct ParameterSector<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl SectorFlash for ParameterSector<'_> {
    fn load(&mut self, image: &mut [u8]) -> Result<(), EepromError> {
        self.flash
            .blocking_read(REGION_START, image)
            .map_err(|_| EepromError::Flash)
    }

    fn program(&mut self, image: &[u8]) -> Result<(), EepromError> {
        self.flash
            .blocking_erase(REGION_START, REGION_START + ERASE_SIZE as u32)
            .map_err(|_| EepromError::Flash)?;

        self.flash
            .blocking_write(REGION_START, image)
            .map_err(|_| EepromError::Flash)
    }
}
