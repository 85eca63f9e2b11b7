// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber
// Log level configurable via environment
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// # Environment
/// - PIPE_QMS_LOG: level filter (default: info)
///   e.g. PIPE_QMS_LOG=debug or PIPE_QMS_LOG=pipe_inspection_qms=trace
///
/// # Example
/// ```no_run
/// use pipe_inspection_qms::logging;
/// logging::init();
/// ```
pub fn init() {
    // Read the level filter from the environment, default info
    let filter = EnvFilter::try_from_env("PIPE_QMS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Initialize logging for tests.
///
/// More verbose level, test-captured writer.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
