//! The cached calculation orchestrator.
//!
//! [`CachedAdapter`] coordinates one full calculation:
//!
//! 1. **Convert** the UTC instant to a Julian Day.
//! 2. **Resolve** symbolic settings into engine flags and a house code.
//! 3. **Compute** each requested body through the body cache, deriving
//!    synthetic points from their anchors without re-invoking the engine.
//! 4. **Compute** the house layout through the house cache when a location
//!    is present.
//! 5. **Aggregate** into a structurally complete [`ChartPositions`].
//!
//! # Locking
//!
//! The engine's sidereal mode is process-global on the real backend, so the
//! engine and the single-slot mode memo live behind one mutex that is held
//! for the whole "ensure mode, then compute" stretch of a calculation.
//! Each cache has its own mutex; cache locks are only ever taken while the
//! engine lock is already held, so the lock order is fixed and deadlock-free.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crius_cache::{BodyKey, BoundedCache, CacheConfig, CacheStats, HouseKey};
use crius_core::config::CriusConfig;
use crius_core::engine::{EphemerisEngine, RawHouseResult, SiderealMode};
use crius_core::julian::julian_day;
use crius_core::types::{
    BodyPosition, CalcSettings, ChartPositions, GeoLocation, HouseAngles, HouseLayout,
};
use crius_core::Body;

use crate::resolver::ResolvedSettings;
use crate::validation::validate_ephemeris_path;
use crate::AdapterResult;

// ---------------------------------------------------------------------------
// AdapterCacheStats
// ---------------------------------------------------------------------------

/// Combined counters for the adapter's two caches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdapterCacheStats {
    pub bodies: CacheStats,
    pub houses: CacheStats,
}

// ---------------------------------------------------------------------------
// CachedAdapter
// ---------------------------------------------------------------------------

/// The engine plus the memo of its currently configured global sidereal
/// mode. Kept together under one lock so no thread can observe a mode set
/// by another thread mid-calculation.
struct EngineState {
    engine: Box<dyn EphemerisEngine>,
    current_mode: Option<SiderealMode>,
}

/// A caching adapter in front of an [`EphemerisEngine`].
///
/// Construction validates the configured ephemeris data path and fails
/// immediately on a bad deployment. Calculation itself never fails: a bad
/// body is omitted, a failed house computation becomes the empty layout.
pub struct CachedAdapter {
    state: Mutex<EngineState>,
    body_cache: Mutex<BoundedCache<BodyKey, BodyPosition>>,
    house_cache: Mutex<BoundedCache<HouseKey, HouseLayout>>,
}

impl CachedAdapter {
    /// Creates an adapter, validating the ephemeris data path and pointing
    /// the engine at it.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::EphemerisPath`](crate::AdapterError::EphemerisPath)
    /// when the resolved path does not hold engine data files, or
    /// [`AdapterError::Cache`](crate::AdapterError::Cache) when a configured
    /// cache capacity is zero.
    pub fn new(mut engine: Box<dyn EphemerisEngine>, config: &CriusConfig) -> AdapterResult<Self> {
        let data_path = config.data_path();
        validate_ephemeris_path(&data_path)?;
        engine.set_ephemeris_path(&data_path);
        info!(path = %data_path.display(), "ephemeris data path configured");

        let body_cache =
            BoundedCache::new(CacheConfig::with_capacity(config.cache.body_capacity))?;
        let house_cache =
            BoundedCache::new(CacheConfig::with_capacity(config.cache.house_capacity))?;

        Ok(Self {
            state: Mutex::new(EngineState {
                engine,
                current_mode: None,
            }),
            body_cache: Mutex::new(body_cache),
            house_cache: Mutex::new(house_cache),
        })
    }

    /// Calculates positions for all requested bodies, plus a house layout
    /// when a location is given.
    ///
    /// The instant must already be UTC; no timezone conversion is applied.
    /// Unrecognized body names are omitted. A per-body engine failure omits
    /// that body only; a house computation failure yields the empty layout
    /// shape. The returned value is always structurally complete.
    pub fn calc_positions(
        &self,
        instant: DateTime<Utc>,
        location: Option<GeoLocation>,
        settings: &CalcSettings,
    ) -> ChartPositions {
        let jd = julian_day(instant);
        let resolved = ResolvedSettings::from_settings(settings);

        // Hold the engine lock for the whole calculation so the sidereal
        // mode configured below cannot be replaced before we compute.
        let mut state = lock(&self.state);
        if let Some(mode) = resolved.sidereal_mode {
            ensure_sidereal_mode(&mut state, mode);
        }

        let mut bodies: BTreeMap<Body, BodyPosition> = BTreeMap::new();
        for name in &settings.bodies {
            let Some(body) = Body::parse(name) else {
                debug!(body = %name, "unrecognized body; omitting");
                continue;
            };

            let position = match body.derived_from() {
                Some(anchor) => self
                    .cached_body(&mut state, anchor, jd, resolved.flags)
                    .map(|p| derive_opposite(&p)),
                None => self.cached_body(&mut state, body, jd, resolved.flags),
            };

            if let Some(position) = position {
                bodies.insert(body, position);
            }
        }

        let houses = location.map(|loc| {
            self.cached_houses(&mut state, jd, loc, &settings.house_system, &resolved)
        });

        ChartPositions { bodies, houses }
    }

    /// Empties both caches and resets their counters.
    pub fn clear_cache(&self) {
        lock(&self.body_cache).clear();
        lock(&self.house_cache).clear();
    }

    /// Returns a snapshot of both caches' counters.
    pub fn cache_stats(&self) -> AdapterCacheStats {
        AdapterCacheStats {
            bodies: lock(&self.body_cache).stats(),
            houses: lock(&self.house_cache).stats(),
        }
    }

    /// Cache-or-compute for one directly computable body.
    ///
    /// Returns `None` when the body has no engine id or the engine fails;
    /// failures are logged and never cached.
    fn cached_body(
        &self,
        state: &mut EngineState,
        body: Body,
        jd: f64,
        flags: i32,
    ) -> Option<BodyPosition> {
        let engine_id = body.engine_id()?;
        let key = BodyKey::new(jd, body, flags);

        if let Some(position) = lock(&self.body_cache).get(&key) {
            return Some(position);
        }

        match state.engine.compute_body(jd, engine_id, flags) {
            Ok(raw) => {
                let position = BodyPosition {
                    longitude: raw.longitude.rem_euclid(360.0),
                    latitude: raw.latitude,
                    speed_longitude: raw.speed_longitude,
                    retrograde: raw.speed_longitude < 0.0,
                };
                lock(&self.body_cache).put(key, position);
                Some(position)
            }
            Err(e) => {
                warn!(body = %body, error = %e, "body computation failed; omitting");
                None
            }
        }
    }

    /// Cache-or-compute for the house layout.
    ///
    /// On engine failure the empty layout shape is returned and nothing is
    /// cached.
    fn cached_houses(
        &self,
        state: &mut EngineState,
        jd: f64,
        location: GeoLocation,
        system_name: &str,
        resolved: &ResolvedSettings,
    ) -> HouseLayout {
        let key = HouseKey::new(
            jd,
            location.latitude,
            location.longitude,
            resolved.house_code,
            resolved.flags,
        );

        if let Some(layout) = lock(&self.house_cache).get(&key) {
            return layout;
        }

        match state.engine.compute_houses(
            jd,
            location.latitude,
            location.longitude,
            resolved.house_code,
            resolved.flags,
        ) {
            Ok(raw) => {
                let layout = normalize_houses(&raw, system_name);
                lock(&self.house_cache).put(key, layout.clone());
                layout
            }
            Err(e) => {
                warn!(error = %e, "house computation failed; returning empty layout");
                HouseLayout::empty(system_name)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Locks a mutex, recovering the guard from a poisoned lock. All protected
/// values stay internally consistent because every mutation is a single
/// non-panicking step.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reconfigures the engine's global sidereal mode only when it differs from
/// the memoized current mode.
fn ensure_sidereal_mode(state: &mut EngineState, mode: SiderealMode) {
    if state.current_mode == Some(mode) {
        return;
    }
    state.engine.set_sidereal_mode(mode);
    state.current_mode = Some(mode);
    debug!(mode = %mode, "sidereal mode configured");
}

/// Derives the point opposite an anchor position: longitude shifted by
/// 180 degrees, zero latitude, the anchor's speed and retrograde flag.
fn derive_opposite(anchor: &BodyPosition) -> BodyPosition {
    BodyPosition {
        longitude: (anchor.longitude + 180.0).rem_euclid(360.0),
        latitude: 0.0,
        speed_longitude: anchor.speed_longitude,
        retrograde: anchor.retrograde,
    }
}

/// Normalizes a raw house result into a [`HouseLayout`], deriving the two
/// dependent angles.
fn normalize_houses(raw: &RawHouseResult, system_name: &str) -> HouseLayout {
    let cusps = extract_cusps(&raw.cusps);

    let ascendant = raw.ascmc.first().map_or(0.0, |v| v.rem_euclid(360.0));
    let midheaven = raw.ascmc.get(1).map_or(0.0, |v| v.rem_euclid(360.0));

    HouseLayout {
        system: system_name.to_string(),
        cusps,
        angles: HouseAngles {
            ascendant,
            midheaven,
            imum_coeli: (midheaven + 180.0).rem_euclid(360.0),
            descendant: (ascendant + 180.0).rem_euclid(360.0),
        },
    }
}

/// Extracts 1-based house cusps from either raw array shape.
///
/// A 12-entry array maps indices 0..11 to houses 1..12 (sign-aligned
/// systems); any other length uses the cusp-indexed layout where indices
/// 1..12 map to houses 1..12 and index 0 is unused.
fn extract_cusps(raw: &[f64]) -> BTreeMap<u8, f64> {
    let mut cusps = BTreeMap::new();
    if raw.len() == 12 {
        for (i, value) in raw.iter().enumerate() {
            cusps.insert(i as u8 + 1, value.rem_euclid(360.0));
        }
    } else {
        for house in 1..=12u8 {
            if let Some(value) = raw.get(usize::from(house)) {
                cusps.insert(house, value.rem_euclid(360.0));
            }
        }
    }
    cusps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_derivation_wraps_longitude() {
        let anchor = BodyPosition {
            longitude: 212.5,
            latitude: 1.2,
            speed_longitude: -0.05,
            retrograde: true,
        };
        let derived = derive_opposite(&anchor);
        assert!((derived.longitude - 32.5).abs() < 1e-9);
        assert_eq!(derived.latitude, 0.0);
        assert_eq!(derived.speed_longitude, anchor.speed_longitude);
        assert!(derived.retrograde);
    }

    #[test]
    fn twelve_entry_cusps_are_sign_aligned() {
        let raw: Vec<f64> = (0..12).map(|i| f64::from(i) * 30.0).collect();
        let cusps = extract_cusps(&raw);
        assert_eq!(cusps.len(), 12);
        assert_eq!(cusps[&1], 0.0);
        assert_eq!(cusps[&12], 330.0);
    }

    #[test]
    fn thirteen_entry_cusps_skip_index_zero() {
        let mut raw = vec![999.0];
        raw.extend((0..12).map(|i| 15.0 + f64::from(i) * 30.0));
        let cusps = extract_cusps(&raw);
        assert_eq!(cusps.len(), 12);
        assert_eq!(cusps[&1], 15.0);
        assert_eq!(cusps[&12], 345.0);
    }

    #[test]
    fn short_cusp_arrays_yield_partial_mappings() {
        let cusps = extract_cusps(&[999.0, 10.0, 40.0]);
        assert_eq!(cusps.len(), 2);
        assert_eq!(cusps[&1], 10.0);
        assert_eq!(cusps[&2], 40.0);
    }

    #[test]
    fn angles_are_derived_exactly() {
        let raw = RawHouseResult {
            cusps: vec![0.0; 13],
            ascmc: vec![275.0, 190.0],
        };
        let layout = normalize_houses(&raw, "placidus");
        assert_eq!(layout.angles.ascendant, 275.0);
        assert_eq!(layout.angles.midheaven, 190.0);
        assert_eq!(layout.angles.imum_coeli, 10.0);
        assert_eq!(layout.angles.descendant, 95.0);
    }
}
