//! simple-term-menu CLI
//!
//! Show a selection menu and report the chosen entry as exit status
//! (first entry = 1, cancelled = 0).

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use simple_term_menu::capability::{CapabilityContext, TputProvider};
use simple_term_menu::error::MenuError;
use simple_term_menu::logging;
use simple_term_menu::menu::{exit_status, Menu};
use simple_term_menu::types::{validate_entries, MenuConfig};

#[derive(Parser, Debug)]
#[command(name = "simple-term-menu")]
#[command(about = "Show a simple terminal menu and return the selected entry as exit code")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Menu title
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Menu cursor glyph
    #[arg(short = 'c', long, default_value = "> ")]
    cursor: String,

    /// Style for the menu cursor as comma separated list
    #[arg(
        short = 's',
        long = "cursor_style",
        visible_alias = "cursor-style",
        default_value = "fg_red,bold"
    )]
    cursor_style: String,

    /// Style for the selected menu entry as comma separated list
    #[arg(
        short = 'm',
        long = "highlight_style",
        visible_alias = "highlight-style",
        default_value = "standout"
    )]
    highlight_style: String,

    /// Stop at the first and last entry instead of wrapping around
    #[arg(short = 'C', long)]
    no_cycle: bool,

    /// Print the version number and exit
    #[arg(short = 'V', long)]
    version: bool,

    /// Menu entries
    entries: Vec<String>,
}

fn main() -> ExitCode {
    // Help and usage errors still exit 0: nonzero statuses mean selections
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    if let Err(e) = logging::init_from_env() {
        eprintln!("Warning: could not open log file: {}", e);
    }

    if cli.version {
        println!("{}, version {}", program_name(), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(selection) => ExitCode::from(exit_status(selection)),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: Cli) -> Result<Option<usize>, MenuError> {
    validate_entries(&cli.entries)?;
    let config = MenuConfig::from_raw(
        cli.title,
        cli.cursor,
        &cli.cursor_style,
        &cli.highlight_style,
        !cli.no_cycle,
    )?;
    let menu = Menu::new(cli.entries, config)?;

    let caps = CapabilityContext::new(TputProvider);
    menu.show(&caps)
}

/// Name the binary was invoked as.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

// ============================================================================
// TESTS
// ============================================================================
