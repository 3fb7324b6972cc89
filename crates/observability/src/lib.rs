//! Tracing/logging setup shared by hosts embedding the engine.
//!
//! The policy crates themselves only *emit* (and the pure evaluation paths
//! emit nothing at all); wiring a subscriber is the host's job and this is
//! the default wiring.

pub mod tracing;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
