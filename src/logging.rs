//! Diagnostic logging.
//!
//! The terminal belongs to the menu, so log records never go to stdout or
//! stderr. They are written to the file named by [`LOG_ENV_VAR`], or
//! dropped when it is unset.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Environment variable naming the log file.
pub const LOG_ENV_VAR: &str = "SIMPLE_TERM_MENU_LOG";

/// Install the file logger if [`LOG_ENV_VAR`] is set and non-empty.
///
/// Returns whether a logger was installed.
///
/// # Errors
/// The log file cannot be opened.
pub fn init_from_env() -> io::Result<bool> {
    match std::env::var_os(LOG_ENV_VAR) {
        Some(path) if !path.is_empty() => {
            init_file_logger(Path::new(&path))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Append debug-level records to `path`.
///
/// A second call in the same process keeps the first logger.
///
/// # Errors
/// The log file cannot be opened.
pub fn init_file_logger(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if WriteLogger::init(LevelFilter::Debug, config, file).is_err() {
        log::debug!("logger already installed, keeping it");
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
