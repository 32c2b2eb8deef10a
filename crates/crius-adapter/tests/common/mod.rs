//! Shared fixtures for adapter integration tests: a scripted engine with
//! call recording, and a temporary ephemeris data directory.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crius_core::config::CriusConfig;
use crius_core::engine::{
    EngineError, EphemerisEngine, RawBodyResult, RawHouseResult, SiderealMode,
};

/// Everything the scripted engine was asked to do, for assertions.
#[derive(Debug, Default)]
pub struct Recorder {
    pub body_calls: Vec<(i32, i32)>,
    pub house_calls: usize,
    pub mode_sets: Vec<SiderealMode>,
    pub path_sets: Vec<PathBuf>,
}

/// An [`EphemerisEngine`] that replays canned results and records calls.
pub struct ScriptedEngine {
    positions: HashMap<i32, RawBodyResult>,
    failing: HashSet<i32>,
    houses: Option<RawHouseResult>,
    recorder: Arc<Mutex<Recorder>>,
}

impl ScriptedEngine {
    /// An engine loaded with plausible values for 2024-01-01T12:00:00Z:
    /// the Sun in early Capricorn, a retrograde true node in Aries, and a
    /// 13-entry Placidus cusp array for New York.
    pub fn realistic() -> Self {
        let mut positions = HashMap::new();
        // (engine id, lon, lat, speed)
        for (id, lon, lat, speed) in [
            (0, 280.459, 0.000_1, 1.019),   // sun
            (1, 135.215, 4.832, 13.176),    // moon
            (2, 267.905, -1.262, 1.556),    // mercury
            (3, 242.118, 1.934, 1.231),     // venus
            (4, 267.301, -0.527, 0.748),    // mars
            (11, 20.831, 0.0, -0.052),      // true node (retrograde)
            (15, 15.901, 2.118, 0.031),     // chiron
        ] {
            positions.insert(
                id,
                RawBodyResult {
                    longitude: lon,
                    latitude: lat,
                    speed_longitude: speed,
                },
            );
        }

        let mut cusps = vec![0.0]; // index 0 unused in the 13-entry shape
        cusps.extend((0..12).map(|i| (48.5 + f64::from(i) * 30.0) % 360.0));

        Self {
            positions,
            failing: HashSet::new(),
            houses: Some(RawHouseResult {
                cusps,
                ascmc: vec![48.5, 315.2],
            }),
            recorder: Arc::new(Mutex::new(Recorder::default())),
        }
    }

    /// Marks one body id as failing with an engine error.
    pub fn failing_body(mut self, engine_id: i32) -> Self {
        self.failing.insert(engine_id);
        self
    }

    /// Replaces the canned house result (use `None` for a house failure).
    pub fn with_houses(mut self, houses: Option<RawHouseResult>) -> Self {
        self.houses = houses;
        self
    }

    /// Returns a handle on the call recorder, valid after the engine has
    /// been boxed and moved into the adapter.
    pub fn recorder(&self) -> Arc<Mutex<Recorder>> {
        Arc::clone(&self.recorder)
    }
}

impl EphemerisEngine for ScriptedEngine {
    fn compute_body(
        &self,
        _julian_day: f64,
        body_id: i32,
        flags: i32,
    ) -> Result<RawBodyResult, EngineError> {
        self.recorder.lock().unwrap().body_calls.push((body_id, flags));
        if self.failing.contains(&body_id) {
            return Err(EngineError::Computation {
                code: -1,
                message: "scripted failure".to_string(),
            });
        }
        self.positions
            .get(&body_id)
            .copied()
            .ok_or(EngineError::NoResult)
    }

    fn compute_houses(
        &self,
        _julian_day: f64,
        _latitude: f64,
        _longitude: f64,
        _system_code: u8,
        _flags: i32,
    ) -> Result<RawHouseResult, EngineError> {
        self.recorder.lock().unwrap().house_calls += 1;
        self.houses.clone().ok_or(EngineError::NoResult)
    }

    fn set_sidereal_mode(&mut self, mode: SiderealMode) {
        self.recorder.lock().unwrap().mode_sets.push(mode);
    }

    fn set_ephemeris_path(&mut self, path: &Path) {
        self.recorder.lock().unwrap().path_sets.push(path.to_path_buf());
    }
}

/// A temporary directory that passes ephemeris path validation.
pub fn ephemeris_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("sepl_18.se1"), vec![0u8; 2048]).unwrap();
    std::fs::write(tmp.path().join("semo_18.se1"), vec![0u8; 2048]).unwrap();
    tmp
}

/// Config pointing at `data_path` with the given cache capacities.
pub fn test_config(data_path: &Path, body_capacity: usize, house_capacity: usize) -> CriusConfig {
    let mut config = CriusConfig::default();
    config.ephemeris.data_path = Some(data_path.to_path_buf());
    config.cache.body_capacity = body_capacity;
    config.cache.house_capacity = house_capacity;
    config
}
