use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::ExportConfig;

/// Builds the filter from `RUST_LOG`, falling back to `level`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},compliance_docs={level},compliance_app={level}"
        ))
    })
}

/// Initializes logging with a daily rolling file under `~/.compliancehub/logs`
/// and a compact stderr layer. stdout stays free for command output.
///
/// The returned guard flushes the file writer on drop and must outlive the app.
pub fn init_logging(config: &ExportConfig) -> Result<WorkerGuard> {
    let logs_dir = ExportConfig::logs_dir()?;
    init_logging_to_dir(&logs_dir, &config.log_level, true)
}

/// Initializes logging into `logs_dir`. With `console` unset only the file
/// layer is installed, which is what tests and embedders usually want.
pub fn init_logging_to_dir(logs_dir: &Path, level: &str, console: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, "chub-export");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    let console_layer = console.then(|| {
        fmt::layer()
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_to_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let logs_dir = tmp.path().join("nested").join("logs");
        assert!(!logs_dir.exists());

        // Only one global subscriber per process; the directory is created
        // whether or not this call wins the race.
        let result = init_logging_to_dir(&logs_dir, "warn", false);
        assert!(logs_dir.exists());

        match result {
            Ok(guard) => drop(guard),
            Err(e) => assert!(e.to_string().contains("logging"), "unexpected error: {e}"),
        }
    }

    #[test]
    fn test_env_filter_accepts_levels() {
        for level in ["info", "debug", "warn", "trace", "error"] {
            drop(env_filter(level));
        }
    }
}
