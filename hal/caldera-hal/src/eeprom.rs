//! Byte-addressable persistent storage
//!
//! Models the small EEPROM-style region that holds the thermostat
//! parameters. Records live at fixed byte offsets, so the interface is
//! plain offset reads and writes rather than a key-value map.
//!
//! Writes are synchronous and carry no atomicity guarantee. Callers are
//! expected to detect torn records themselves (tag/version check).

/// Errors from persistent storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Access past the end of the region
    OutOfBounds,
    /// Underlying flash/EEPROM operation failed
    Flash,
}

/// Byte-addressable persistent storage region
///
/// Implementations should handle:
/// - Mapping region offsets onto the physical medium
/// - Any erase-before-write requirement of the medium
pub trait Eeprom {
    /// Size of the region in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError>;

    /// Set every byte of the region to zero
    fn erase_all(&mut self) -> Result<(), EepromError>;
}

/// Check that `len` bytes at `offset` fit inside a region of `capacity`
pub fn check_bounds(capacity: usize, offset: usize, len: usize) -> Result<(), EepromError> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(EepromError::OutOfBounds),
    }
}

/// RAM-backed storage region
///
/// Used by host tests and as a stand-in on boards without a persistent
/// medium. Contents start zeroed, like a factory-reset part.
#[derive(Debug, Clone)]
pub struct RamEeprom<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> Default for RamEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamEeprom<N> {
    /// Create a zeroed region
    pub const fn new() -> Self {
        Self { data: [0; N] }
    }

    /// Raw view of the region
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.data
    }

    /// Mutable raw view, for simulating corruption
    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }
}

impl<const N: usize> Eeprom for RamEeprom<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        check_bounds(N, offset, buffer.len())?;
        buffer.copy_from_slice(&self.data[offset..offset + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        check_bounds(N, offset, data.len())?;
        self.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn erase_all(&mut self) -> Result<(), EepromError> {
        self.data = [0; N];
        Ok(())
    }
}

/// Erase-sector medium holding one whole region image
///
/// Flash cannot rewrite bytes in place, so the medium is only ever
/// loaded or reprogrammed as a unit.
pub trait SectorFlash {
    /// Read the stored image into `image`
    fn load(&mut self, image: &mut [u8]) -> Result<(), EepromError>;

    /// Erase the sector and program `image`
    fn program(&mut self, image: &[u8]) -> Result<(), EepromError>;
}

/// EEPROM emulation over a [`SectorFlash`]
///
/// Reads come from a RAM mirror of the sector. A write builds the new
/// image in a scratch copy and reprograms the sector; the mirror only
/// takes the new image once programming succeeded, so it never claims
/// bytes the medium does not hold.
pub struct MirroredEeprom<F, const N: usize> {
    flash: F,
    mirror: [u8; N],
}

impl<F: SectorFlash, const N: usize> MirroredEeprom<F, N> {
    /// Load the sector into the mirror
    pub fn new(mut flash: F) -> Result<Self, EepromError> {
        let mut mirror = [0; N];
        flash.load(&mut mirror)?;
        Ok(Self { flash, mirror })
    }

    /// The underlying medium
    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    fn commit(&mut self, image: [u8; N]) -> Result<(), EepromError> {
        self.flash.program(&image)?;
        self.mirror = image;
        Ok(())
    }
}

impl<F: SectorFlash, const N: usize> Eeprom for MirroredEeprom<F, N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        check_bounds(N, offset, buffer.len())?;
        buffer.copy_from_slice(&self.mirror[offset..offset + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        check_bounds(N, offset, data.len())?;

        if self.mirror[offset..offset + data.len()] == *data {
            return Ok(());
        }

        let mut image = self.mirror;
        image[offset..offset + data.len()].copy_from_slice(data);
        self.commit(image)
    }

    fn erase_all(&mut self) -> Result<(), EepromError> {
        self.commit([0; N])
    }
}
