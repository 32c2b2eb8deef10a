//! Symbolic settings resolution.
//!
//! Maps human-readable configuration (zodiac mode, ayanamsa name, house
//! system name) to the engine's numeric flag bitmask, sidereal-mode
//! identifier, and house-system code byte. All name lookups are
//! case-insensitive; unrecognized names resolve to documented defaults
//! rather than erroring.

use tracing::debug;

use crius_core::engine::{SiderealMode, FLG_SIDEREAL, FLG_SWIEPH};
use crius_core::types::CalcSettings;
use crius_core::ZodiacMode;

/// Ayanamsa used when none is named or the name is unrecognized.
pub const DEFAULT_AYANAMSA: SiderealMode = SiderealMode::Lahiri;

/// House-system code used when the name is unrecognized (Placidus).
pub const DEFAULT_HOUSE_SYSTEM_CODE: u8 = b'P';

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Resolves an ayanamsa name to an engine sidereal-mode identifier.
///
/// `None` or an unrecognized name resolves to Lahiri (Chitrapaksha), the
/// documented default. "chitrapaksha" is an alias of Lahiri.
#[must_use]
pub fn resolve_ayanamsa(name: Option<&str>) -> SiderealMode {
    let Some(name) = name else {
        return DEFAULT_AYANAMSA;
    };
    match name.to_ascii_lowercase().as_str() {
        "lahiri" | "chitrapaksha" => SiderealMode::Lahiri,
        "fagan_bradley" => SiderealMode::FaganBradley,
        "de_luce" => SiderealMode::DeLuce,
        "raman" => SiderealMode::Raman,
        "krishnamurti" => SiderealMode::Krishnamurti,
        "djwhal_khul" => SiderealMode::DjwhalKhul,
        "yukteshwar" => SiderealMode::Yukteshwar,
        "aryabhata" => SiderealMode::Aryabhata,
        "aryabhata_mean_sun" => SiderealMode::AryabhataMeanSun,
        "true_citra" => SiderealMode::TrueCitra,
        "true_revati" => SiderealMode::TrueRevati,
        other => {
            debug!(ayanamsa = other, "unrecognized ayanamsa; using default");
            DEFAULT_AYANAMSA
        }
    }
}

/// Resolves a house-system name to the engine's code byte.
///
/// Unrecognized names resolve to Placidus.
#[must_use]
pub fn resolve_house_system(name: &str) -> u8 {
    match name.to_ascii_lowercase().as_str() {
        "placidus" => b'P',
        "whole_sign" => b'W',
        "koch" => b'K',
        "equal" => b'E',
        "regiomontanus" => b'R',
        "campanus" => b'C',
        "alcabitius" => b'A',
        "morinus" => b'M',
        other => {
            debug!(house_system = other, "unrecognized house system; using default");
            DEFAULT_HOUSE_SYSTEM_CODE
        }
    }
}

// ---------------------------------------------------------------------------
// ResolvedSettings
// ---------------------------------------------------------------------------

/// The engine-level view of one request's settings.
///
/// Resolution itself is pure; ensuring the engine's global sidereal mode
/// actually matches `sidereal_mode` is the orchestrator's job, under its
/// engine lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Flag bitmask passed to every engine call.
    pub flags: i32,
    /// House-system code byte.
    pub house_code: u8,
    /// Sidereal mode the engine must be configured with before computing,
    /// or `None` under the tropical zodiac.
    pub sidereal_mode: Option<SiderealMode>,
}

impl ResolvedSettings {
    /// Resolves symbolic settings into engine-level values.
    #[must_use]
    pub fn from_settings(settings: &CalcSettings) -> Self {
        let house_code = resolve_house_system(&settings.house_system);

        match settings.zodiac {
            ZodiacMode::Tropical => Self {
                flags: FLG_SWIEPH,
                house_code,
                sidereal_mode: None,
            },
            ZodiacMode::Sidereal => Self {
                flags: FLG_SWIEPH | FLG_SIDEREAL,
                house_code,
                sidereal_mode: Some(resolve_ayanamsa(settings.ayanamsa.as_deref())),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
