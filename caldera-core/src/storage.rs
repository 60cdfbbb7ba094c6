//! Persisted parameter record
//!
//! The parameters live in a fixed-layout record at the start of the
//! EEPROM region:
//!
//! ```text
//! offset  width  field
//!      0      2  tag "PT"
//!      2      1  format version
//!      3      2  requested temperature   i16 LE (°C × 100)
//!      5      2  hysteresis              i16 LE (°C × 100)
//!      7      2  minimum temperature     i16 LE (°C × 100)
//!      9      2  maximum temperature     i16 LE (°C × 100)
//!     11      4  maximum heat duration   u32 LE (ms)
//!     15      4  grace duration          u32 LE (ms)
//!     19      2  offset temperature      i16 LE (°C × 100)
//! ```
//!
//! Any change to the field set or widths must bump [`RECORD_VERSION`]
//! so old records are replaced with defaults instead of misread.
//!
//! Writes are not atomic. A power loss half way through a save can leave
//! a torn record; that is caught by the tag/version check on the next
//! load and the defaults are restored. This is the accepted failure mode.

use caldera_hal::eeprom::{Eeprom, EepromError};

use crate::params::ControlParameters;

/// Record tag
pub const RECORD_TAG: [u8; 2] = *b"PT";

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// Encoded record length in bytes
pub const RECORD_LEN: usize = 21;

const TAG_AT: usize = 0;
const VERSION_AT: usize = 2;
const REQUESTED_AT: usize = 3;
const HYSTERESIS_AT: usize = 5;
const MIN_AT: usize = 7;
const MAX_AT: usize = 9;
const MAX_HEAT_AT: usize = 11;
const GRACE_AT: usize = 15;
const OFFSET_AT: usize = 19;

/// Errors from writing the parameter record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Underlying storage failed
    Eeprom(EepromError),
}

impl From<EepromError> for StorageError {
    fn from(e: EepromError) -> Self {
        StorageError::Eeprom(e)
    }
}

/// What `load` found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// A valid record was read
    Loaded,
    /// Record missing or corrupt; defaults were written back
    Restored,
    /// Record missing or corrupt, and writing the defaults back failed
    RestoreFailed(StorageError),
}

/// Encode parameters into the fixed-layout record
pub fn encode(params: &ControlParameters) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];

    buf[TAG_AT..TAG_AT + 2].copy_from_slice(&RECORD_TAG);
    buf[VERSION_AT] = RECORD_VERSION;
    put_i16(&mut buf, REQUESTED_AT, params.requested_x100);
    put_i16(&mut buf, HYSTERESIS_AT, params.hysteresis_x100);
    put_i16(&mut buf, MIN_AT, params.min_x100);
    put_i16(&mut buf, MAX_AT, params.max_x100);
    put_u32(&mut buf, MAX_HEAT_AT, params.max_heat_ms);
    put_u32(&mut buf, GRACE_AT, params.grace_ms);
    put_i16(&mut buf, OFFSET_AT, params.offset_x100);

    buf
}

/// Decode a record, or `None` if the tag or version does not match
pub fn decode(buf: &[u8; RECORD_LEN]) -> Option<ControlParameters> {
    if buf[TAG_AT..TAG_AT + 2] != RECORD_TAG || buf[VERSION_AT] != RECORD_VERSION {
        return None;
    }

    Some(ControlParameters {
        requested_x100: get_i16(buf, REQUESTED_AT),
        hysteresis_x100: get_i16(buf, HYSTERESIS_AT),
        min_x100: get_i16(buf, MIN_AT),
        max_x100: get_i16(buf, MAX_AT),
        max_heat_ms: get_u32(buf, MAX_HEAT_AT),
        grace_ms: get_u32(buf, GRACE_AT),
        offset_x100: get_i16(buf, OFFSET_AT),
    })
}

fn put_i16(buf: &mut [u8; RECORD_LEN], at: usize, value: i16) {
    buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8; RECORD_LEN], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn get_i16(buf: &[u8; RECORD_LEN], at: usize) -> i16 {
    i16::from_le_bytes([buf[at], buf[at + 1]])
}

fn get_u32(buf: &[u8; RECORD_LEN], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Parameter persistence over an EEPROM region
///
/// Holds no parameters of its own; every call works on a copy handed in
/// or handed back.
pub struct ParameterStore<E> {
    eeprom: E,
}

impl<E: Eeprom> ParameterStore<E> {
    /// Create a store over the given region
    pub fn new(eeprom: E) -> Self {
        Self { eeprom }
    }

    /// Consume the store and return the underlying region
    pub fn into_inner(self) -> E {
        self.eeprom
    }

    /// Borrow the underlying region
    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    /// Load the stored parameters
    ///
    /// Never fails: a missing, torn, or unreadable record is replaced by
    /// the defaults, which are written straight back.
    pub fn load(&mut self) -> (ControlParameters, LoadOutcome) {
        let mut buf = [0u8; RECORD_LEN];
        let stored = match self.eeprom.read(0, &mut buf) {
            Ok(()) => decode(&buf),
            Err(_) => None,
        };

        if let Some(params) = stored {
            return (params, LoadOutcome::Loaded);
        }

        let defaults = ControlParameters::default();
        let outcome = match self.save(&defaults) {
            Ok(()) => LoadOutcome::Restored,
            Err(e) => LoadOutcome::RestoreFailed(e),
        };

        (defaults, outcome)
    }

    /// Write the parameters to storage
    pub fn save(&mut self, params: &ControlParameters) -> Result<(), StorageError> {
        self.eeprom.write(0, &encode(params))?;
        Ok(())
    }

    /// Zero the whole storage region
    ///
    /// The next `load` finds no tag and restores the defaults.
    pub fn factory_reset(&mut self) -> Result<(), StorageError> {
        self.eeprom.erase_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caldera_hal::eeprom::RamEeprom;

    fn custom_params() -> ControlParameters {
        ControlParameters {
            requested_x100: 6_250,
            hysteresis_x100: 300,
            min_x100: -500,
            max_x100: 9_000,
            max_heat_ms: 3_600_000,
            grace_ms: 60_000,
            offset_x100: -150,
        }
    }

    #[test]
    fn test_record_layout() {
        let buf = encode(&custom_params());

        assert_eq!(&buf[0..2], b"PT");
        assert_eq!(buf[2], RECORD_VERSION);
        assert_eq!(&buf[3..5], &6_250i16.to_le_bytes());
        assert_eq!(&buf[7..9], &(-500i16).to_le_bytes());
        assert_eq!(&buf[11..15], &3_600_000u32.to_le_bytes());
        assert_eq!(&buf[19..21], &(-150i16).to_le_bytes());
    }

    #[test]
    fn test_save_then_fresh_load() {
        let mut store = ParameterStore::new(RamEeprom::<64>::new());
        store.save(&custom_params()).unwrap();

        // Fresh store over the same bytes
        let mut reloaded = ParameterStore::new(store.into_inner());
        let (params, outcome) = reloaded.load();

        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(params, custom_params());
    }

    #[test]
    fn test_corrupt_tag_restores_defaults() {
        let mut store = ParameterStore::new(RamEeprom::<64>::new());
        store.save(&custom_params()).unwrap();

        let mut eeprom = store.into_inner();
        eeprom.as_bytes_mut()[0] = b'X';

        let mut store = ParameterStore::new(eeprom);
        let (params, outcome) = store.load();

        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(params, ControlParameters::default());

        // Storage now holds the defaults
        let stored = store.eeprom().as_bytes();
        assert_eq!(&stored[..RECORD_LEN], &encode(&ControlParameters::default()));
    }

    #[test]
    fn test_version_mismatch_restores_defaults() {
        let mut eeprom = RamEeprom::<64>::new();
        let mut buf = encode(&custom_params());
        buf[VERSION_AT] = RECORD_VERSION + 1;
        eeprom.write(0, &buf).unwrap();

        let (params, outcome) = ParameterStore::new(eeprom).load();
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(params, ControlParameters::default());
    }

    #[test]
    fn test_blank_storage_restores_defaults() {
        let (params, outcome) = ParameterStore::new(RamEeprom::<32>::new()).load();
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(params, ControlParameters::default());
    }

    #[test]
    fn test_factory_reset_zeroes_region() {
        let mut store = ParameterStore::new(RamEeprom::<32>::new());
        store.save(&custom_params()).unwrap();
        store.factory_reset().unwrap();

        assert_eq!(store.eeprom().as_bytes(), &[0u8; 32]);

        let (params, outcome) = store.load();
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(params, ControlParameters::default());
    }

    #[test]
    fn test_region_too_small() {
        let mut store = ParameterStore::new(RamEeprom::<8>::new());

        assert_eq!(
            store.save(&custom_params()),
            Err(StorageError::Eeprom(EepromError::OutOfBounds))
        );

        let (params, outcome) = store.load();
        assert_eq!(params, ControlParameters::default());
        assert_eq!(
            outcome,
            LoadOutcome::RestoreFailed(StorageError::Eeprom(EepromError::OutOfBounds))
        );
    }
}
