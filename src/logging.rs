//! Logging setup
//!
//! The TUI owns stdout, so application logs go to a file under the local
//! data directory. `RUST_LOG` overrides the configured level.

use crate::{CmpMenuError, Result, APP_NAME, LOG_FILE};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default log directory: `<data_local_dir>/cmpmenu`, or the running
/// directory when the platform has none.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(crate::config::running_directory)
}

/// Build the filter from `RUST_LOG`, falling back to `level`
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| CmpMenuError::ConfigError(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber writing to `<log_dir>/cmpmenu.log`.
///
/// Returns the path of the log file.
pub fn init(level: &str, log_dir: &Path) -> Result<PathBuf> {
    let filter = build_filter(level)?;

    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .map_err(|e| CmpMenuError::ConfigError(format!("Logging already initialized: {}", e)))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = %path.display(), "logging started");
    Ok(path)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(build_filter("info").is_ok());
        assert!(build_filter("cmpmenu=debug").is_ok());
        assert!(build_filter("cmpmenu=verbose").is_err());
    }

    #[test]
    fn test_default_log_dir_is_app_specific() {
        let dir = default_log_dir();
        assert!(dir.ends_with(APP_NAME) || dir == crate::config::running_directory());
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        tracing::warn!("test tracing active");
    }
}
