//! Cache behavior through the adapter: idempotence, key collision at
//! sub-resolution deltas, FIFO eviction, derived-node caching, and reset.

mod common;

use chrono::{Duration, TimeZone, Utc};

use common::{ephemeris_dir, test_config, ScriptedEngine};
use crius_adapter::CachedAdapter;
use crius_core::types::{CalcSettings, GeoLocation};
use crius_core::Body;

fn new_york() -> GeoLocation {
    GeoLocation::new(40.7128, -74.0060).unwrap()
}

fn noon_2024() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

#[test]
fn repeated_identical_requests_are_idempotent_and_fully_cached() {
    let dir = ephemeris_dir();
    let engine = ScriptedEngine::realistic();
    let recorder = engine.recorder();
    let adapter =
        CachedAdapter::new(Box::new(engine), &test_config(dir.path(), 128, 128)).unwrap();

    let settings = CalcSettings::tropical("placidus", &["sun", "moon", "mercury"]);
    let first = adapter.calc_positions(noon_2024(), Some(new_york()), &settings);

    let stats = adapter.cache_stats();
    assert_eq!(stats.bodies.hits, 0);
    assert_eq!(stats.bodies.misses, 3);
    assert_eq!(stats.houses.misses, 1);

    let second = adapter.calc_positions(noon_2024(), Some(new_york()), &settings);
    assert_eq!(first, second, "identical requests must yield identical results");

    // Everything served from cache: hits grew by the distinct sub-requests,
    // misses unchanged, no new engine calls.
    let stats = adapter.cache_stats();
    assert_eq!(stats.bodies.hits, 3);
    assert_eq!(stats.bodies.misses, 3);
    assert_eq!(stats.houses.hits, 1);
    assert_eq!(stats.houses.misses, 1);

    let recorded = recorder.lock().unwrap();
    assert_eq!(recorded.body_calls.len(), 3);
    assert_eq!(recorded.house_calls, 1);
}

#[test]
fn serialized_results_are_byte_identical_across_calls() {
    let dir = ephemeris_dir();
    let adapter = CachedAdapter::new(
        Box::new(ScriptedEngine::realistic()),
        &test_config(dir.path(), 128, 128),
    )
    .unwrap();

    let settings = CalcSettings::tropical("placidus", &["sun", "north_node"]);
    let first = adapter.calc_positions(noon_2024(), Some(new_york()), &settings);
    let second = adapter.calc_positions(noon_2024(), Some(new_york()), &settings);

    let a = serde_json::to_vec(&first).unwrap();
    let b = serde_json::to_vec(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn requests_within_cache_resolution_collide() {
    let dir = ephemeris_dir();
    let engine = ScriptedEngine::realistic();
    let recorder = engine.recorder();
    let adapter =
        CachedAdapter::new(Box::new(engine), &test_config(dir.path(), 128, 128)).unwrap();

    let settings = CalcSettings::tropical("placidus", &["sun"]);
    let near_location = GeoLocation::new(40.712_81, -74.006_01).unwrap(); // ~1 m away

    let first = adapter.calc_positions(noon_2024(), Some(new_york()), &settings);
    let second = adapter.calc_positions(
        noon_2024() + Duration::seconds(20),
        Some(near_location),
        &settings,
    );

    assert_eq!(first, second);
    let recorded = recorder.lock().unwrap();
    assert_eq!(recorded.body_calls.len(), 1, "20 s delta must share the key");
    assert_eq!(recorded.house_calls, 1, "~1 m delta must share the key");
}

#[test]
fn requests_beyond_cache_resolution_do_not_collide() {
    let dir = ephemeris_dir();
    let engine = ScriptedEngine::realistic();
    let recorder = engine.recorder();
    let adapter =
        CachedAdapter::new(Box::new(engine), &test_config(dir.path(), 128, 128)).unwrap();

    let settings = CalcSettings::tropical("placidus", &["sun"]);
    adapter.calc_positions(noon_2024(), None, &settings);
    adapter.calc_positions(noon_2024() + Duration::seconds(90), None, &settings);

    assert_eq!(recorder.lock().unwrap().body_calls.len(), 2);
}

#[test]
fn body_cache_evicts_the_first_inserted_entry() {
    let dir = ephemeris_dir();
    let engine = ScriptedEngine::realistic();
    let recorder = engine.recorder();
    // Body cache holds only two entries.
    let adapter =
        CachedAdapter::new(Box::new(engine), &test_config(dir.path(), 2, 128)).unwrap();

    let settings = CalcSettings::tropical("placidus", &["sun", "moon", "mercury"]);
    adapter.calc_positions(noon_2024(), None, &settings);
    assert_eq!(adapter.cache_stats().bodies.size, 2);

    // Sun was inserted first, so it was evicted; moon and mercury were not.
    let again = CalcSettings::tropical("placidus", &["moon", "mercury", "sun"]);
    adapter.calc_positions(noon_2024(), None, &again);

    let recorded = recorder.lock().unwrap();
    let sun_calls = recorded.body_calls.iter().filter(|(id, _)| *id == 0).count();
    let moon_calls = recorded.body_calls.iter().filter(|(id, _)| *id == 1).count();
    assert_eq!(sun_calls, 2, "evicted sun must be recomputed");
    assert_eq!(moon_calls, 1, "moon must still be cached");
}

#[test]
fn south_node_derives_from_cached_north_node() {
    let dir = ephemeris_dir();
    let engine = ScriptedEngine::realistic();
    let recorder = engine.recorder();
    let adapter =
        CachedAdapter::new(Box::new(engine), &test_config(dir.path(), 128, 128)).unwrap();

    let settings = CalcSettings::tropical("placidus", &["north_node", "south_node"]);
    let chart = adapter.calc_positions(noon_2024(), None, &settings);

    let north = chart.bodies[&Body::NorthNode];
    let south = chart.bodies[&Body::SouthNode];
    assert!((south.longitude - (north.longitude + 180.0).rem_euclid(360.0)).abs() < 1e-6);
    assert_eq!(south.latitude, 0.0);
    assert_eq!(south.retrograde, north.retrograde);

    // Only the anchor is ever cached or computed; the derived point rides
    // on the north node's cache entry.
    assert_eq!(adapter.cache_stats().bodies.size, 1);
    assert_eq!(recorder.lock().unwrap().body_calls.len(), 1);
}

#[test]
fn south_node_alone_still_resolves_through_the_anchor() {
    let dir = ephemeris_dir();
    let adapter = CachedAdapter::new(
        Box::new(ScriptedEngine::realistic()),
        &test_config(dir.path(), 128, 128),
    )
    .unwrap();

    let settings = CalcSettings::tropical("placidus", &["south_node"]);
    let chart = adapter.calc_positions(noon_2024(), None, &settings);

    assert!(chart.bodies.contains_key(&Body::SouthNode));
    assert!(!chart.bodies.contains_key(&Body::NorthNode));
    assert_eq!(adapter.cache_stats().bodies.size, 1, "anchor entry only");
}

#[test]
fn clear_cache_resets_stats_and_forces_recomputation() {
    let dir = ephemeris_dir();
    let engine = ScriptedEngine::realistic();
    let recorder = engine.recorder();
    let adapter =
        CachedAdapter::new(Box::new(engine), &test_config(dir.path(), 128, 128)).unwrap();

    let settings = CalcSettings::tropical("placidus", &["sun"]);
    adapter.calc_positions(noon_2024(), Some(new_york()), &settings);
    adapter.clear_cache();

    let stats = adapter.cache_stats();
    assert_eq!(stats.bodies.hits, 0);
    assert_eq!(stats.bodies.misses, 0);
    assert_eq!(stats.bodies.size, 0);
    assert_eq!(stats.houses.size, 0);

    adapter.calc_positions(noon_2024(), Some(new_york()), &settings);
    let recorded = recorder.lock().unwrap();
    assert_eq!(recorded.body_calls.len(), 2);
    assert_eq!(recorded.house_calls, 2);
}

#[test]
fn failed_computations_are_never_cached() {
    let dir = ephemeris_dir();
    let engine = ScriptedEngine::realistic().failing_body(0);
    let recorder = engine.recorder();
    let adapter =
        CachedAdapter::new(Box::new(engine), &test_config(dir.path(), 128, 128)).unwrap();

    let settings = CalcSettings::tropical("placidus", &["sun"]);
    adapter.calc_positions(noon_2024(), None, &settings);
    adapter.calc_positions(noon_2024(), None, &settings);

    assert_eq!(adapter.cache_stats().bodies.size, 0);
    // The engine is re-asked every time; failures never populate the cache.
    assert_eq!(recorder.lock().unwrap().body_calls.len(), 2);
}
