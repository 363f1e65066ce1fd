//! Tracing/logging setup shared by binaries and tests.

/// Initialize process-wide logging with the format chosen by `POSMRP_LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    logging::init_with(logging::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod logging;
