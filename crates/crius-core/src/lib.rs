//! Crius Core -- shared types, configuration, and the engine seam for the
//! crius cached ephemeris adapter.
//!
//! This crate defines the symbolic enums used throughout crius (celestial
//! bodies, zodiac modes, zodiac signs), the fixed-field result records
//! (positions, house layouts), UTC-to-Julian-Day conversion, and the
//! [`engine::EphemerisEngine`] trait that the actual ephemeris backend
//! implements.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod engine;
pub mod julian;
pub mod types;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Top-level error type for the crius-core crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration error (malformed config file, bad value).
    #[error("configuration error: {0}")]
    Config(String),

    /// A geographic coordinate was outside its valid range.
    #[error("coordinate out of range: {0}")]
    CoordinateRange(String),

    /// Tracing/logging initialization failed.
    #[error("tracing initialization error: {0}")]
    TracingInit(String),
}

/// Convenience alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

// ---------------------------------------------------------------------------
// Tracing / Logging
// ---------------------------------------------------------------------------

/// Initialize structured tracing with the given verbosity level.
///
/// # Behaviour
///
/// | `verbose` | `quiet` | `json_output` | Effect                           |
/// |-----------|---------|---------------|----------------------------------|
/// | `true`    | _       | _             | TRACE level (most verbose)       |
/// | _         | `true`  | _             | ERROR level only                 |
/// | `false`   | `false` | _             | INFO level (default)             |
/// | _         | _       | `true`        | JSON-formatted log lines         |
/// | _         | _       | `false`       | Human-readable, compact lines    |
///
/// The `RUST_LOG` environment variable, when set, takes precedence over the
/// programmatic level selection so that operators can fine-tune per-module
/// verbosity without recompiling.
///
/// # Errors
///
/// Returns [`CoreError::TracingInit`] if the global subscriber has already
/// been set (i.e. this function was called more than once in the same
/// process).
pub fn init_tracing(verbose: bool, quiet: bool, json_output: bool) -> Result<(), CoreError> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose {
        "trace"
    } else if quiet {
        "error"
    } else {
        "info"
    };

    // Allow RUST_LOG to override the programmatic default.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_output {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
            .map_err(|e| CoreError::TracingInit(e.to_string()))
    } else {
        fmt()
            .compact()
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init()
            .map_err(|e| CoreError::TracingInit(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// A celestial body or point that crius can resolve.
///
/// `SouthNode` is purely derived: it has no engine identifier and is always
/// computed as the point opposite [`Body::NorthNode`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
    SouthNode,
}

impl Body {
    /// Parses a body name, case-insensitively.
    ///
    /// Returns `None` for unrecognized names; callers are expected to omit
    /// such bodies from results rather than fail.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        let body = match lowered.as_str() {
            "sun" => Self::Sun,
            "moon" => Self::Moon,
            "mercury" => Self::Mercury,
            "venus" => Self::Venus,
            "mars" => Self::Mars,
            "jupiter" => Self::Jupiter,
            "saturn" => Self::Saturn,
            "uranus" => Self::Uranus,
            "neptune" => Self::Neptune,
            "pluto" => Self::Pluto,
            "chiron" => Self::Chiron,
            "north_node" => Self::NorthNode,
            "south_node" => Self::SouthNode,
            _ => return None,
        };
        Some(body)
    }

    /// Returns the engine-level body identifier, or `None` for derived-only
    /// points.
    ///
    /// The values follow the Swiss Ephemeris numbering (the lunar node uses
    /// the true node, id 11).
    #[must_use]
    pub const fn engine_id(self) -> Option<i32> {
        match self {
            Self::Sun => Some(0),
            Self::Moon => Some(1),
            Self::Mercury => Some(2),
            Self::Venus => Some(3),
            Self::Mars => Some(4),
            Self::Jupiter => Some(5),
            Self::Saturn => Some(6),
            Self::Uranus => Some(7),
            Self::Neptune => Some(8),
            Self::Pluto => Some(9),
            Self::Chiron => Some(15),
            Self::NorthNode => Some(11),
            Self::SouthNode => None,
        }
    }

    /// Returns the body whose computed position this derived point is based
    /// on, or `None` when the body is computed directly.
    #[must_use]
    pub const fn derived_from(self) -> Option<Self> {
        match self {
            Self::SouthNode => Some(Self::NorthNode),
            _ => None,
        }
    }

    /// Returns all directly computable bodies (no derived points).
    #[must_use]
    pub const fn all_computable() -> &'static [Body] {
        &[
            Self::Sun,
            Self::Moon,
            Self::Mercury,
            Self::Venus,
            Self::Mars,
            Self::Jupiter,
            Self::Saturn,
            Self::Uranus,
            Self::Neptune,
            Self::Pluto,
            Self::Chiron,
            Self::NorthNode,
        ]
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
            Self::Chiron => "chiron",
            Self::NorthNode => "north_node",
            Self::SouthNode => "south_node",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// ZodiacMode
// ---------------------------------------------------------------------------

/// Zodiac reference frame for longitude values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacMode {
    /// Tropical zodiac -- longitudes measured from the vernal equinox.
    #[default]
    Tropical,
    /// Sidereal zodiac -- longitudes offset by a named ayanamsa.
    Sidereal,
}

impl fmt::Display for ZodiacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Tropical => "tropical",
            Self::Sidereal => "sidereal",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Sign
// ---------------------------------------------------------------------------

/// One of the twelve zodiac signs, each spanning 30 degrees of longitude.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    /// Returns the sign containing the given ecliptic longitude.
    ///
    /// The longitude is normalized into `[0, 360)` first, so any finite
    /// value is accepted.
    #[must_use]
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        let index = (normalized / 30.0) as usize;
        // rem_euclid keeps us below 360, but guard the boundary anyway.
        Self::all()[index.min(11)]
    }

    /// Returns all signs in zodiacal order (Aries first).
    #[must_use]
    pub const fn all() -> &'static [Sign; 12] {
        &[
            Self::Aries,
            Self::Taurus,
            Self::Gemini,
            Self::Cancer,
            Self::Leo,
            Self::Virgo,
            Self::Libra,
            Self::Scorpio,
            Self::Sagittarius,
            Self::Capricorn,
            Self::Aquarius,
            Self::Pisces,
        ]
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
            Self::Libra => "libra",
            Self::Scorpio => "scorpio",
            Self::Sagittarius => "sagittarius",
            Self::Capricorn => "capricorn",
            Self::Aquarius => "aquarius",
            Self::Pisces => "pisces",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
