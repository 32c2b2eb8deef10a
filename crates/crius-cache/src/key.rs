//! Quantized cache keys for calculation parameters.
//!
//! Continuous coordinates are snapped onto a finite grid so that
//! near-identical requests collide into one cache slot:
//!
//! - Julian Day: nearest 1/1440 day (one minute of civil time), so two
//!   requests less than 30 seconds apart share a key.
//! - Latitude/longitude: nearest 1e-4 degree (~11 m ground resolution),
//!   quantized independently.
//!
//! Rounding is half away from zero (`f64::round`), which is deterministic
//! for repeated identical inputs. Quantized values are stored as integer
//! tick counts rather than re-divided floats, so keys are `Eq + Hash`
//! without comparing floating-point bit patterns.

use crius_core::Body;

/// Ticks per day for time quantization (one tick per minute).
const JD_TICKS_PER_DAY: f64 = 1440.0;

/// Ticks per degree for coordinate quantization (1e-4 degree).
const COORD_TICKS_PER_DEGREE: f64 = 10_000.0;

/// Quantizes a Julian Day to whole minutes.
#[must_use]
pub fn quantize_julian_day(jd: f64) -> i64 {
    (jd * JD_TICKS_PER_DAY).round() as i64
}

/// Quantizes a coordinate (degrees) to 1e-4 degree ticks.
#[must_use]
pub fn quantize_coordinate(degrees: f64) -> i64 {
    (degrees * COORD_TICKS_PER_DEGREE).round() as i64
}

// ---------------------------------------------------------------------------
// BodyKey
// ---------------------------------------------------------------------------

/// Cache key for one body position: quantized time, body, and flag bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyKey {
    jd_minutes: i64,
    body: Body,
    flags: i32,
}

impl BodyKey {
    /// Builds a key from un-quantized calculation parameters.
    #[must_use]
    pub fn new(jd: f64, body: Body, flags: i32) -> Self {
        Self {
            jd_minutes: quantize_julian_day(jd),
            body,
            flags,
        }
    }
}

// ---------------------------------------------------------------------------
// HouseKey
// ---------------------------------------------------------------------------

/// Cache key for one house layout: quantized time and place, system code,
/// and flag bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HouseKey {
    jd_minutes: i64,
    latitude_ticks: i64,
    longitude_ticks: i64,
    system_code: u8,
    flags: i32,
}

impl HouseKey {
    /// Builds a key from un-quantized calculation parameters.
    #[must_use]
    pub fn new(jd: f64, latitude: f64, longitude: f64, system_code: u8, flags: i32) -> Self {
        Self {
            jd_minutes: quantize_julian_day(jd),
            latitude_ticks: quantize_coordinate(latitude),
            longitude_ticks: quantize_coordinate(longitude),
            system_code,
            flags,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
