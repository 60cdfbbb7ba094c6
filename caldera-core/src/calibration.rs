//! Thermistor calibration table
//!
//! Maps averaged raw sensor units onto temperature by piecewise-linear
//! interpolation between measured breakpoints. Integer-only: the
//! fractional position inside a segment is carried as a fixed-point
//! value scaled by [`INTERPOLATION_SCALE`].

/// Fixed-point scale for the position inside a segment
pub const INTERPOLATION_SCALE: i128 = 1000;

/// Boiler NTC calibration points
///
/// Table format: (averaged raw reading × 100, temperature × 100)
/// Measured against a reference thermometer in the boiler well. The
/// curve is close enough to linear over the working range that a few
/// points give one or two degrees of accuracy.
const BOILER_NTC_POINTS: &[Breakpoint] = &[
    Breakpoint::new(43_500, 1_000), // 10°C
    Breakpoint::new(47_600, 3_000), // 30°C
    Breakpoint::new(51_500, 5_000), // 50°C
    Breakpoint::new(55_300, 7_000), // 70°C
    Breakpoint::new(58_700, 9_000), // 90°C
];

/// Default boiler NTC table
pub const BOILER_NTC: CalibrationTable<'static> = CalibrationTable::new(BOILER_NTC_POINTS);

/// Errors from building a calibration table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Fewer than two breakpoints
    TooFewPoints,
    /// Raw values are not strictly increasing (index of the offending point)
    NotIncreasing(usize),
}

/// One calibration point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Breakpoint {
    /// Raw sensor units (fixed-point, same scale as the sample buffer)
    pub raw: i32,
    /// Temperature (°C × 100)
    pub temp_x100: i32,
}

impl Breakpoint {
    /// Create a breakpoint
    pub const fn new(raw: i32, temp_x100: i32) -> Self {
        Self { raw, temp_x100 }
    }
}

/// Validated, immutable calibration table
///
/// Invariant: at least two points, `raw` strictly increasing.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationTable<'a> {
    points: &'a [Breakpoint],
}

impl<'a> CalibrationTable<'a> {
    /// Validate breakpoints and build a table
    pub const fn try_new(points: &'a [Breakpoint]) -> Result<Self, CalibrationError> {
        if points.len() < 2 {
            return Err(CalibrationError::TooFewPoints);
        }

        let mut i = 1;
        while i < points.len() {
            if points[i].raw <= points[i - 1].raw {
                return Err(CalibrationError::NotIncreasing(i));
            }
            i += 1;
        }

        Ok(Self { points })
    }

    /// Build a table from constant breakpoints
    ///
    /// Intended for `const` tables, where an invalid table fails the build.
    pub const fn new(points: &'a [Breakpoint]) -> Self {
        match Self::try_new(points) {
            Ok(table) => table,
            Err(CalibrationError::TooFewPoints) => {
                panic!("calibration table needs at least two points")
            }
            Err(CalibrationError::NotIncreasing(_)) => {
                panic!("calibration raw values must be strictly increasing")
            }
        }
    }

    /// The breakpoints, ordered by raw value
    pub fn points(&self) -> &'a [Breakpoint] {
        self.points
    }

    /// Convert a raw value to temperature (°C × 100)
    ///
    /// Inside the table this is linear interpolation between the
    /// bracketing breakpoints (`X_i <= raw < X_i+1`). Outside it the first
    /// or last segment is extended, so the result is defined for every
    /// input. Extrapolating a steep edge segment far outside the table
    /// saturates at the `i32` range.
    pub fn interpolate(&self, raw: i32) -> i32 {
        let segment = self.segment_for(raw);
        let lo = self.points[segment];
        let hi = self.points[segment + 1];

        // Extrapolated products far outside the table exceed i64
        let span = hi.raw as i128 - lo.raw as i128;
        let frac = (raw as i128 - lo.raw as i128) * INTERPOLATION_SCALE / span;

        let temp = (lo.temp_x100 as i128 * (INTERPOLATION_SCALE - frac)
            + hi.temp_x100 as i128 * frac)
            / INTERPOLATION_SCALE;

        temp.clamp(i32::MIN as i128, i32::MAX as i128) as i32
    }

    /// Index of the segment used for `raw`
    fn segment_for(&self, raw: i32) -> usize {
        let last_segment = self.points.len() - 2;

        // Scan from the low end; first point above raw closes the bracket
        self.points[1..]
            .iter()
            .position(|p| raw < p.raw)
            .unwrap_or(last_segment)
    }
}
