//! Crius Adapter -- cached calculation orchestration.
//!
//! The [`CachedAdapter`] sits between callers and an
//! [`EphemerisEngine`](crius_core::engine::EphemerisEngine) backend. It
//! resolves symbolic settings into engine flags, checks the bounded caches
//! before every expensive computation, populates them on miss, derives
//! synthetic points (the south node) without touching the engine, and
//! isolates per-body failures so one bad computation never aborts a chart.

pub mod adapter;
pub mod resolver;
pub mod validation;

pub use adapter::{AdapterCacheStats, CachedAdapter};
pub use resolver::{resolve_ayanamsa, resolve_house_system, ResolvedSettings};

// ---------------------------------------------------------------------------
// AdapterError
// ---------------------------------------------------------------------------

/// Top-level error type for the crius-adapter crate.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The ephemeris data path failed validation at construction time.
    #[error("ephemeris data path invalid: {0}")]
    EphemerisPath(String),

    /// A cache could not be constructed from the configured capacities.
    #[error(transparent)]
    Cache(#[from] crius_cache::CacheError),

    /// An error bubbled up from crius-core.
    #[error(transparent)]
    Core(#[from] crius_core::CoreError),
}

/// Convenience alias for `Result<T, AdapterError>`.
pub type AdapterResult<T> = Result<T, AdapterError>;
