//! The ephemeris engine seam.
//!
//! crius does not implement celestial mechanics. All orbital and
//! house-geometry math is delegated to a backend implementing
//! [`EphemerisEngine`] -- typically a binding to the Swiss Ephemeris C
//! library. The trait deliberately mirrors that library's call surface:
//! per-call computation plus two process-global configuration knobs
//! (ephemeris data path and sidereal mode).
//!
//! Because the real backend's sidereal mode and data path are process-global
//! mutable state, the orchestrator in `crius-adapter` serializes every
//! "ensure mode, then compute" sequence behind one lock. Implementations
//! only need `Send`, not `Sync`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Engine flags
// ---------------------------------------------------------------------------

/// Use the Swiss Ephemeris data files (as opposed to the JPL or Moshier
/// backends). Always set by crius.
pub const FLG_SWIEPH: i32 = 2;

/// Report sidereal longitudes using the currently configured sidereal mode.
pub const FLG_SIDEREAL: i32 = 1 << 16;

// ---------------------------------------------------------------------------
// SiderealMode
// ---------------------------------------------------------------------------

/// Engine-level sidereal mode (ayanamsa) identifier.
///
/// Discriminants follow the Swiss Ephemeris `SE_SIDM_*` numbering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum SiderealMode {
    FaganBradley = 0,
    Lahiri = 1,
    DeLuce = 2,
    Raman = 3,
    Krishnamurti = 5,
    DjwhalKhul = 6,
    Yukteshwar = 7,
    Aryabhata = 23,
    AryabhataMeanSun = 24,
    TrueCitra = 27,
    TrueRevati = 28,
}

impl SiderealMode {
    /// Returns the engine-level numeric identifier.
    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for SiderealMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FaganBradley => "fagan_bradley",
            Self::Lahiri => "lahiri",
            Self::DeLuce => "de_luce",
            Self::Raman => "raman",
            Self::Krishnamurti => "krishnamurti",
            Self::DjwhalKhul => "djwhal_khul",
            Self::Yukteshwar => "yukteshwar",
            Self::Aryabhata => "aryabhata",
            Self::AryabhataMeanSun => "aryabhata_mean_sun",
            Self::TrueCitra => "true_citra",
            Self::TrueRevati => "true_revati",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Raw results
// ---------------------------------------------------------------------------

/// Un-normalized body computation output, exactly as reported by the engine.
///
/// The longitude may be outside `[0, 360)`; normalization happens in the
/// orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBodyResult {
    pub longitude: f64,
    pub latitude: f64,
    pub speed_longitude: f64,
}

/// Un-normalized house computation output.
///
/// `cusps` comes in one of two shapes depending on the house system:
/// exactly 12 entries where indices 0..11 map to houses 1..12 (sign-aligned
/// systems such as Whole Sign), or 13 entries where indices 1..12 map to
/// houses 1..12 and index 0 is unused (the classic Swiss Ephemeris layout).
/// `ascmc` holds the ascendant at index 0 and the midheaven at index 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHouseResult {
    pub cusps: Vec<f64>,
    pub ascmc: Vec<f64>,
}

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Error reported by the engine for a single computation.
///
/// A body-level failure never aborts the surrounding calculation; the
/// orchestrator logs it and omits the body from the result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// The engine reported a computation failure.
    #[error("engine computation failed (code {code}): {message}")]
    Computation { code: i32, message: String },

    /// The engine returned no usable result.
    #[error("engine returned no usable result")]
    NoResult,
}

// ---------------------------------------------------------------------------
// EphemerisEngine trait
// ---------------------------------------------------------------------------

/// A backend capable of computing body positions and house cusps.
///
/// Computation methods are synchronous and CPU-bound. The two `set_*`
/// methods mutate process-global backend state and must only be called
/// while holding the orchestrator's engine lock.
pub trait EphemerisEngine: Send {
    /// Computes the position of one body at the given Julian Day.
    fn compute_body(
        &self,
        julian_day: f64,
        body_id: i32,
        flags: i32,
    ) -> Result<RawBodyResult, EngineError>;

    /// Computes house cusps and angles for a time and place.
    fn compute_houses(
        &self,
        julian_day: f64,
        latitude: f64,
        longitude: f64,
        system_code: u8,
        flags: i32,
    ) -> Result<RawHouseResult, EngineError>;

    /// Selects the global sidereal mode used by subsequent sidereal
    /// computations.
    fn set_sidereal_mode(&mut self, mode: SiderealMode);

    /// Points the engine at its ephemeris data files.
    fn set_ephemeris_path(&mut self, path: &Path);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
