//! Fixed-field result records and calculation inputs.
//!
//! The upstream engine reports positions as loosely shaped arrays; crius
//! normalizes everything into the records defined here so callers get
//! compile-time shape guarantees: a [`BodyPosition`] always has a normalized
//! longitude, a [`HouseLayout`] always has its four angles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Body, CoreError, Sign, ZodiacMode};

// ---------------------------------------------------------------------------
// GeoLocation
// ---------------------------------------------------------------------------

/// A validated geographic location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees, within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    pub longitude: f64,
}

impl GeoLocation {
    /// Creates a location, validating both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CoordinateRange`] if latitude is outside
    /// `[-90, 90]` or longitude outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::CoordinateRange(format!(
                "latitude {latitude} not in [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::CoordinateRange(format!(
                "longitude {longitude} not in [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

// ---------------------------------------------------------------------------
// CalcSettings
// ---------------------------------------------------------------------------

/// Symbolic calculation settings for one chart.
///
/// Names are resolved case-insensitively; unrecognized house-system or
/// ayanamsa names fall back to documented defaults, unrecognized body names
/// are silently omitted from results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcSettings {
    /// Zodiac reference frame.
    pub zodiac: ZodiacMode,
    /// Ayanamsa name; only meaningful under [`ZodiacMode::Sidereal`].
    pub ayanamsa: Option<String>,
    /// House-system name (e.g. `"placidus"`, `"whole_sign"`).
    pub house_system: String,
    /// Requested body names, in output order. Duplicates are allowed.
    pub bodies: Vec<String>,
}

impl CalcSettings {
    /// Tropical settings with the given house system and bodies.
    #[must_use]
    pub fn tropical(house_system: &str, bodies: &[&str]) -> Self {
        Self {
            zodiac: ZodiacMode::Tropical,
            ayanamsa: None,
            house_system: house_system.to_string(),
            bodies: bodies.iter().map(|b| (*b).to_string()).collect(),
        }
    }

    /// Sidereal settings with the given ayanamsa, house system, and bodies.
    #[must_use]
    pub fn sidereal(ayanamsa: &str, house_system: &str, bodies: &[&str]) -> Self {
        Self {
            zodiac: ZodiacMode::Sidereal,
            ayanamsa: Some(ayanamsa.to_string()),
            house_system: house_system.to_string(),
            bodies: bodies.iter().map(|b| (*b).to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// BodyPosition
// ---------------------------------------------------------------------------

/// The computed position of one body, normalized from the raw engine output.
///
/// Immutable once computed for a given (time, body, flags) triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Ecliptic longitude in degrees, normalized into `[0, 360)`.
    pub longitude: f64,
    /// Ecliptic latitude in degrees.
    pub latitude: f64,
    /// Longitudinal speed in degrees per day.
    pub speed_longitude: f64,
    /// `true` when the body appears to move backwards (negative speed).
    pub retrograde: bool,
}

impl BodyPosition {
    /// Returns the zodiac sign containing this position's longitude.
    #[must_use]
    pub fn sign(&self) -> Sign {
        Sign::from_longitude(self.longitude)
    }
}

// ---------------------------------------------------------------------------
// HouseLayout
// ---------------------------------------------------------------------------

/// The four primary angles of a house layout.
///
/// `imum_coeli` and `descendant` are always derived from the midheaven and
/// ascendant respectively; they are never fetched from the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseAngles {
    pub ascendant: f64,
    pub midheaven: f64,
    pub imum_coeli: f64,
    pub descendant: f64,
}

/// A complete house layout: twelve cusps plus the four angles.
///
/// When the engine cannot produce a layout at all, crius returns the
/// empty shape from [`HouseLayout::empty`] instead of failing the whole
/// calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseLayout {
    /// House-system name the layout was requested with.
    pub system: String,
    /// Cusp longitudes keyed by 1-based house number.
    pub cusps: BTreeMap<u8, f64>,
    /// The four primary angles.
    pub angles: HouseAngles,
}

impl HouseLayout {
    /// The fallback shape returned when house computation fails: no cusps,
    /// zeroed angles, but still structurally complete.
    #[must_use]
    pub fn empty(system: &str) -> Self {
        Self {
            system: system.to_string(),
            cusps: BTreeMap::new(),
            angles: HouseAngles::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChartPositions
// ---------------------------------------------------------------------------

/// The result of one full calculation: body positions plus an optional
/// house layout.
///
/// Always structurally complete -- `bodies` may be empty and `houses` is
/// `None` only when no location was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPositions {
    /// Positions keyed by body. Bodies the engine could not compute, and
    /// unrecognized names, are simply absent.
    pub bodies: BTreeMap<Body, BodyPosition>,
    /// House layout, present iff a location was supplied.
    pub houses: Option<HouseLayout>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
