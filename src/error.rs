//! Error types for simple-term-menu.
//!
//! Pre-session errors (styles, entries, capabilities, tty checks) are raised
//! before the terminal is touched. `Io` is the only error that can surface
//! from inside a running session, and only after cleanup has run.

use std::io;

use thiserror::Error;

/// Failure while querying the terminal capability database.
///
/// An absent capability is not an error; it resolves to an empty sequence.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Could not run tput: {0}")]
    Spawn(#[source] io::Error),

    #[error("tput {capname} failed with status {status}: {stderr}")]
    QueryFailed {
        capname: String,
        status: String,
        stderr: String,
    },

    #[error("Unexpected color count from terminal database: {0:?}")]
    InvalidColorCount(String),
}

/// Everything that can stop a menu from producing a selection.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("{}", describe_invalid_styles(.0))]
    InvalidStyle(Vec<String>),

    #[error("No menu entries given!")]
    NoEntries,

    #[error("Too many menu entries ({count}); at most {max} can be reported as exit code")]
    TooManyEntries { count: usize, max: usize },

    #[error("Standard input is not a terminal")]
    NotATerminal,

    #[error("Menu needs {rows} rows but the terminal only has {height}")]
    TooTall { rows: usize, height: usize },

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

fn describe_invalid_styles(styles: &[String]) -> String {
    match styles {
        [single] => format!("The style \"{}\" does not exist.", single),
        many => format!("The styles (\"{}\") do not exist.", many.join("\", \"")),
    }
}

// ============================================================================
// TESTS
// ============================================================================
