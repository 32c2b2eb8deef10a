//! Crius Cache -- bounded in-memory caching for ephemeris results.
//!
//! Provides a fixed-capacity map with FIFO eviction over insertion order,
//! hit/miss accounting, and the quantized key builders that collapse
//! near-identical calculation parameters into one cache slot.

pub mod cache;
pub mod key;

pub use cache::{BoundedCache, CacheConfig, CacheStats};
pub use key::{BodyKey, HouseKey};

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error type for cache construction.
///
/// Lookups and insertions never fail; only an unusable configuration is
/// rejected, at construction time.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid cache capacity: {0}")]
    InvalidCapacity(String),
}
