//! Tracing/logging setup shared by binaries and test harnesses that embed the
//! QMS client.

/// Initialize process-wide observability with the defaults (JSON, `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogConfig::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
