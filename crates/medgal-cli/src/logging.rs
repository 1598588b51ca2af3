//! File-based logging setup.
//!
//! The portal runs on the alternate screen, so log output goes to
//! ${MEDGAL_HOME}/logs/ instead of stderr. `RUST_LOG` controls the filter.

use medgal_core::config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initializes tracing to a daily-rolling log file. Returns the writer
/// guard; dropping it flushes remaining output, so hold it for the process
/// lifetime. Logging is best-effort: failure to create the directory just
/// means no logs.
pub fn init() -> Option<WorkerGuard> {
    let logs_dir = config::paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, "medgal.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Some(guard)
}
