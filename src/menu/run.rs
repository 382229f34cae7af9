//! Menu effects boundary: session lifecycle, key mapping, the event loop.
//!
//! The only part of the menu with side effects. It wires the pure layers
//! (state, update) and the renderer to a terminal device, an input source
//! and an output stream. Every session ends the same way, whatever stopped
//! it: clear the menu, then restore the terminal.

use std::io::{self, Write};

use crossterm::tty::IsTty;

use crate::capability::{CapabilityContext, TerminalCapabilityProvider};
use crate::error::MenuError;
use crate::input::{KeyDecoder, KeyEvent, KeyInputSource, TtyInput};
use crate::terminal::{TerminalDevice, TerminalMode, Tty};
use crate::types::{validate_entries, MenuConfig};

use super::state::{Action, Navigation, SelectionState};
use super::update::update;
use super::view::MenuView;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a decoded key to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: &KeyEvent) -> Option<Action> {
    match key {
        KeyEvent::Up => Some(Action::MoveUp),
        KeyEvent::Down => Some(Action::MoveDown),
        KeyEvent::Char(c) if c == "k" => Some(Action::MoveUp),
        KeyEvent::Char(c) if c == "j" => Some(Action::MoveDown),
        KeyEvent::Enter => Some(Action::Select),
        KeyEvent::Escape | KeyEvent::Interrupt => Some(Action::Cancel),
        KeyEvent::Char(_) => None,
    }
}

/// Process exit status reporting a session result.
///
/// Entry `i` reports `i + 1`; no selection reports 0.
pub fn exit_status(selection: Option<usize>) -> u8 {
    selection
        .and_then(|index| u8::try_from(index + 1).ok())
        .unwrap_or(0)
}

// ============================================================================
// MENU
// ============================================================================

/// A validated, ready-to-show menu.
#[derive(Debug, Clone)]
pub struct Menu {
    entries: Vec<String>,
    config: MenuConfig,
}

impl Menu {
    /// # Errors
    /// `NoEntries` or `TooManyEntries`; nothing touches the terminal.
    pub fn new(entries: Vec<String>, config: MenuConfig) -> Result<Self, MenuError> {
        validate_entries(&entries)?;
        Ok(Self { entries, config })
    }

    /// Show the menu on the controlling terminal and wait for a choice.
    ///
    /// Keys are read from stdin, the menu is drawn on stdout. Returns the
    /// selected index, or None when the user cancelled.
    ///
    /// # Errors
    /// Pre-session checks fail before the terminal is touched. An I/O
    /// failure during the session is reported after cleanup.
    pub fn show<P>(&self, caps: &CapabilityContext<P>) -> Result<Option<usize>, MenuError>
    where
        P: TerminalCapabilityProvider,
    {
        if !io::stdin().is_tty() {
            return Err(MenuError::NotATerminal);
        }
        let height = MenuView::new(caps.map()?, &self.config, &self.entries).height();
        fits_terminal(height, crossterm::terminal::size())?;

        let tty = Tty::stdin();
        let mut input = TtyInput::new(&tty)?;
        self.show_with(caps, &tty, &mut input, io::stdout().lock())
    }

    /// Run one session against explicit collaborators.
    ///
    /// Capabilities are resolved before the terminal is touched, so a
    /// failing capability query never leaves the terminal in menu mode.
    ///
    /// # Errors
    /// See [`Menu::show`].
    pub fn show_with<P, D, S, W>(
        &self,
        caps: &CapabilityContext<P>,
        device: &D,
        input: &mut S,
        out: W,
    ) -> Result<Option<usize>, MenuError>
    where
        P: TerminalCapabilityProvider,
        D: TerminalDevice,
        S: KeyInputSource + ?Sized,
        W: Write,
    {
        let caps = caps.map()?;
        let decoder = KeyDecoder::new(caps, self.config.ignore_case);
        let view = MenuView::new(caps, &self.config, &self.entries);
        let nav = Navigation {
            len: self.entries.len(),
            cycle: self.config.cycle,
        };

        log::info!(
            "showing menu with {} entries on a {}-color terminal",
            self.entries.len(),
            caps.colors()
        );
        let mut mode = TerminalMode::enter(device, caps, out)?;

        let outcome = run_session(&view, &decoder, nav, input, mode.out());
        let cleared = view.clear(mode.out());
        let restored = mode.exit();

        let state = outcome?;
        cleared?;
        restored?;

        log::info!("menu finished: {:?}", state);
        Ok(state.selection())
    }
}

/// Check that `rows` menu lines fit the reported terminal size.
///
/// An unknown size, or a zero height (no window size set on the pty),
/// skips the check.
fn fits_terminal(rows: usize, size: io::Result<(u16, u16)>) -> Result<(), MenuError> {
    match size {
        Ok((_, 0)) => {
            log::debug!("terminal reports zero rows, skipping height check");
            Ok(())
        }
        Ok((_, height)) if rows > usize::from(height) => Err(MenuError::TooTall {
            rows,
            height: usize::from(height),
        }),
        Ok(_) => Ok(()),
        Err(e) => {
            log::debug!("terminal size unknown ({}), skipping height check", e);
            Ok(())
        }
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Paint the menu and feed keys through the state machine until it ends.
fn run_session<S, W>(
    view: &MenuView<'_>,
    decoder: &KeyDecoder<'_>,
    nav: Navigation,
    input: &mut S,
    out: &mut W,
) -> Result<SelectionState, MenuError>
where
    S: KeyInputSource + ?Sized,
    W: Write + ?Sized,
{
    let mut state = SelectionState::start();
    let mut shown = 0;
    view.paint_initial(out, shown)?;
    view.reposition(out, shown, shown)?;

    while state.is_active() {
        let key = decoder.read_next_key(input)?;
        let Some(action) = map_key(&key) else {
            log::trace!("ignoring key {:?}", key);
            continue;
        };

        state = update(state, action, nav);
        if let SelectionState::Active(new) = state {
            if new != shown {
                view.paint_entries(out, new)?;
                view.reposition(out, shown, new)?;
                shown = new;
            }
        }
    }

    Ok(state)
}

// ============================================================================
// TESTS
// ============================================================================
