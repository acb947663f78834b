//! Tracing, logging, metrics (shared setup).
//!
//! Handlers and adapters emit structured `tracing` events; this crate owns
//! the process-wide subscriber so binaries and test harnesses configure
//! logging in one place.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Logging configuration.
pub mod logging {}

/// Metrics setup and exporters.
pub mod metrics {}
