//! Configuration loading and merging for crius.
//!
//! crius resolves configuration from multiple sources with project > home >
//! defaults precedence. Configuration is loaded from `.crius.yaml` files.
//! The `SWISS_EPHEMERIS_PATH` environment variable overrides the configured
//! ephemeris data path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::CoreError;

/// Fallback ephemeris data directory when neither config nor environment
/// provide one.
pub const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

/// Environment variable that overrides the ephemeris data path.
pub const EPHEMERIS_PATH_ENV: &str = "SWISS_EPHEMERIS_PATH";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Top-level crius configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CriusConfig {
    /// Ephemeris backend settings.
    pub ephemeris: EphemerisConfig,
    /// Cache capacities.
    pub cache: CacheSettings,
    /// Default symbolic settings applied when a request leaves them blank.
    pub defaults: DefaultsConfig,
}

impl CriusConfig {
    /// Resolves the ephemeris data path: explicit config value first, then
    /// the `SWISS_EPHEMERIS_PATH` environment variable, then the built-in
    /// default.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        resolve_data_path(
            self.ephemeris.data_path.as_deref(),
            std::env::var_os(EPHEMERIS_PATH_ENV).map(PathBuf::from),
        )
    }
}

/// Pure resolution helper for the ephemeris data path.
fn resolve_data_path(configured: Option<&Path>, env_value: Option<PathBuf>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    if let Some(path) = env_value {
        return path;
    }
    PathBuf::from(DEFAULT_EPHEMERIS_PATH)
}

// ---------------------------------------------------------------------------
// EphemerisConfig
// ---------------------------------------------------------------------------

/// Ephemeris backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Directory containing the engine's `.se1` data files. When unset, the
    /// `SWISS_EPHEMERIS_PATH` environment variable and then the built-in
    /// default are consulted.
    pub data_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// CacheSettings
// ---------------------------------------------------------------------------

/// Capacities for the two calculation caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of cached body positions.
    pub body_capacity: usize,
    /// Maximum number of cached house layouts.
    pub house_capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            body_capacity: 128,
            house_capacity: 128,
        }
    }
}

// ---------------------------------------------------------------------------
// DefaultsConfig
// ---------------------------------------------------------------------------

/// Default symbolic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// House system used when a request's name is empty or unrecognized.
    pub house_system: String,
    /// Ayanamsa used under sidereal mode when none is given.
    pub ayanamsa: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            house_system: "placidus".to_string(),
            ayanamsa: "lahiri".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load and merge configuration from multiple sources.
///
/// Resolution order (highest priority first):
/// 1. `.crius.yaml` in the project directory
/// 2. `.crius.yaml` in the user home directory
/// 3. Built-in defaults
///
/// # Errors
///
/// Returns [`CoreError::Config`] if a config file exists but is malformed.
pub fn load_config(project_dir: Option<&Path>) -> Result<CriusConfig, CoreError> {
    let mut config = CriusConfig::default();

    // Layer 1: Home directory config.
    if let Some(home) = home_dir() {
        let home_config = home.join(".crius.yaml");
        if home_config.is_file() {
            debug!(path = %home_config.display(), "loading home config");
            let layer = load_config_file(&home_config)?;
            config = merge_config(config, layer);
        }
    }

    // Layer 2: Project directory config.
    if let Some(dir) = project_dir {
        let project_config = dir.join(".crius.yaml");
        if project_config.is_file() {
            debug!(path = %project_config.display(), "loading project config");
            let layer = load_config_file(&project_config)?;
            config = merge_config(config, layer);
        }
    }

    info!("configuration loaded");
    Ok(config)
}

/// Load a single config file and deserialize it.
fn load_config_file(path: &Path) -> Result<CriusConfig, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!(
            "failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    serde_yml::from_str(&content).map_err(|e| {
        CoreError::Config(format!(
            "failed to parse config file '{}': {e}",
            path.display()
        ))
    })
}

/// Merge `overlay` on top of `base`. Overlay values win section by section.
fn merge_config(base: CriusConfig, overlay: CriusConfig) -> CriusConfig {
    CriusConfig {
        ephemeris: EphemerisConfig {
            data_path: overlay.ephemeris.data_path.or(base.ephemeris.data_path),
        },
        cache: overlay.cache,
        defaults: overlay.defaults,
    }
}

/// Get the user home directory.
fn home_dir() -> Option<PathBuf> {
    // HOME on macOS/Linux, USERPROFILE on Windows.
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
