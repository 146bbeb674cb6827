//! Consumer-facing surface for larder.
//!
//! Re-exports the record and store crates under short paths, plus an
//! optional env_logger bootstrap for binaries and test harnesses.

/// Re-export for convenience.
pub use larder_record as record;
/// Re-export for convenience.
pub use larder_store as store;

#[inline]
/// Initialize logging via env_logger when the "logging" feature is on.
///
/// Without the feature this is a no-op, so callers can invoke it
/// unconditionally at startup.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
