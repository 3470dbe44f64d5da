//! Diagnostic logging to a file.
//!
//! The terminal is owned by the UI while the app runs, so events are only
//! written when a log file is configured. `RUST_LOG` takes precedence over
//! the configured level.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_LEVEL;
use crate::error::{AppError, Result};

/// Install the global subscriber. Returns `Ok(false)` when no file is
/// configured or a subscriber was already installed.
pub fn init(log_file: Option<&Path>, level: &str) -> Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };
    let file = open_log_file(path)?;

    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(build_filter(level))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    }
    Ok(installed)
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| AppError::from_io(e, dir))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::from_io(e, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_init_without_file_is_disabled() {
        assert_eq!(init(None, "debug").unwrap(), false);
    }

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("nested").join("dnav.log");

        let mut f = open_log_file(&path).unwrap();
        writeln!(f, "first").unwrap();
        drop(f);
        let mut f = open_log_file(&path).unwrap();
        writeln!(f, "second").unwrap();
        drop(f);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_on_directory_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(open_log_file(tmp.path()).is_err());
    }
}
