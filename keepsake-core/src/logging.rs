//! Logging infrastructure for keepsake
//!
//! Logs are written under `~/.local/state/keepsake/` following XDG
//! standards, one file per day (`keepsake.<date>.log`). The terminal belongs
//! to the card, so nothing is logged to stdout or stderr while it is on
//! screen.

use crate::config::{Config, LoggingConfig};
use crate::error::Error;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize the logging system
///
/// Sets up tracing with:
/// - File output to XDG state directory
/// - Daily rotation, keeping at most `max_files` files
/// - Configurable log level via config or RUST_LOG env var
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    init_in(config, &Config::state_dir())
}

/// Initialize logging into an explicit directory
pub fn init_in(config: &LoggingConfig, log_dir: &Path) -> crate::error::Result<LoggingGuard> {
    // Create log directory if it doesn't exist
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("keepsake")
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(log_dir)
        .map_err(|e| Error::Logging(e.to_string()))?;

    // Non-blocking writer so a slow disk never stalls a frame
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Build the filter from config or env var
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Initialize logging for tests (logs to stdout)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Guard that keeps the logging system alive
///
/// When dropped, flushes any pending log writes.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_in_creates_dir_once() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let guard = init_in(&LoggingConfig::default(), &log_dir).unwrap();
        tracing::info!("first entry");
        drop(guard);
        assert!(log_dir.is_dir());

        // The daily roller dates every file name.
        let names: Vec<String> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(
            names
                .iter()
                .any(|name| name.starts_with("keepsake.") && name.ends_with(".log")),
            "no dated log file in {names:?}"
        );
        assert!(!names.iter().any(|name| name == "keepsake.log"));

        // The global subscriber can only be installed once per process.
        assert!(matches!(
            init_in(&LoggingConfig::default(), &log_dir),
            Err(Error::Logging(_))
        ));
    }
}
