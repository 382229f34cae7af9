//! Menu rendering with relative cursor motion.
//!
//! The menu is drawn inline, below the current prompt, without taking over
//! the screen. After every operation the physical cursor rests in column 0
//! of the first entry row ("row zero"), so each redraw can address rows
//! with plain cursor-up / cursor-down sequences.
//!
//! Every byte written is either a resolved capability sequence or entry
//! text with control characters replaced.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::capability::CapabilityMap;
use crate::types::{Codename, MenuConfig, StyleSet};

/// Stand-in for control characters inside entry or title text.
const REPLACEMENT: char = '\u{FFFD}';

/// Paints one menu: title, entries, highlight and cursor glyph.
pub struct MenuView<'a> {
    caps: &'a CapabilityMap,
    config: &'a MenuConfig,
    title: Option<String>,
    entries: Vec<String>,
    padding: String,
}

impl<'a> MenuView<'a> {
    pub fn new(caps: &'a CapabilityMap, config: &'a MenuConfig, entries: &[String]) -> Self {
        Self {
            caps,
            config,
            title: config.title.as_deref().map(printable),
            entries: entries.iter().map(|entry| printable(entry)).collect(),
            padding: " ".repeat(config.cursor.width()),
        }
    }

    /// Rows occupied on screen, title included.
    pub fn height(&self) -> usize {
        self.entries.len() + usize::from(self.title.is_some())
    }

    /// Print the title and all entries, then return to row zero.
    ///
    /// # Errors
    /// Output failures.
    pub fn paint_initial<W: Write + ?Sized>(&self, out: &mut W, selected: usize) -> io::Result<()> {
        let mut frame = String::new();
        if let Some(title) = &self.title {
            frame.push_str(title);
            frame.push('\n');
        }
        self.push_entries(&mut frame, selected);
        emit(out, &frame)
    }

    /// Reprint the entries (not the title) so the highlight follows `selected`.
    ///
    /// Clears the cursor glyph column as a side effect.
    ///
    /// # Errors
    /// Output failures.
    pub fn paint_entries<W: Write + ?Sized>(&self, out: &mut W, selected: usize) -> io::Result<()> {
        let mut frame = String::new();
        self.push_entries(&mut frame, selected);
        emit(out, &frame)
    }

    /// Move the cursor glyph from row `old` to row `new`.
    ///
    /// # Errors
    /// Output failures.
    pub fn reposition<W: Write + ?Sized>(&self, out: &mut W, old: usize, new: usize) -> io::Result<()> {
        let up = self.seq(Codename::CursorUp);
        let down = self.seq(Codename::CursorDown);
        let mut frame = String::new();

        // blank the glyph column on the old row
        frame.push_str(&down.repeat(old));
        frame.push_str(&self.padding);
        frame.push('\r');
        frame.push_str(&up.repeat(old));

        frame.push_str(&down.repeat(new));
        self.push_style(&mut frame, &self.config.cursor_style);
        frame.push_str(&self.config.cursor);
        frame.push_str(self.seq(Codename::ResetAttributes));
        frame.push('\r');
        frame.push_str(&up.repeat(new));

        emit(out, &frame)
    }

    /// Delete every line the menu occupies. Expects the cursor at row zero.
    ///
    /// # Errors
    /// Output failures.
    pub fn clear<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let delete = self.seq(Codename::DeleteLine);
        let mut frame = String::new();
        if self.title.is_some() {
            frame.push_str(self.seq(Codename::CursorUp));
            frame.push_str(delete);
        }
        frame.push_str(&delete.repeat(self.entries.len()));
        emit(out, &frame)
    }

    fn push_entries(&self, frame: &mut String, selected: usize) {
        let last = self.entries.len().saturating_sub(1);

        for (i, entry) in self.entries.iter().enumerate() {
            frame.push_str(&self.padding);
            if i == selected {
                self.push_style(frame, &self.config.highlight_style);
                frame.push_str(entry);
                frame.push_str(self.seq(Codename::ResetAttributes));
            } else {
                frame.push_str(entry);
            }
            if i < last {
                frame.push('\n');
            }
        }

        frame.push('\r');
        frame.push_str(&self.seq(Codename::CursorUp).repeat(last));
    }

    fn push_style(&self, frame: &mut String, style: &StyleSet) {
        for &codename in style.codenames() {
            frame.push_str(self.seq(codename));
        }
    }

    fn seq(&self, codename: Codename) -> &'a str {
        self.caps.resolve(codename)
    }
}

fn emit<W: Write + ?Sized>(out: &mut W, frame: &str) -> io::Result<()> {
    out.write_all(frame.as_bytes())?;
    out.flush()
}

/// Replace control characters so text cannot move the cursor.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { REPLACEMENT } else { c })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
