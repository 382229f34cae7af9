//! Test doubles shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Mutex, MutexGuard};

use crate::capability::{CapabilityMap, TerminalCapabilityProvider};
use crate::error::CapabilityError;
use crate::input::{KeyInputSource, RawInput};
use crate::terminal::TerminalDevice;
use crate::types::Codename;

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Capability provider backed by a fixed table.
pub struct FixedProvider {
    table: HashMap<String, String>,
    failing: Option<String>,
    queries: Cell<usize>,
}

impl FixedProvider {
    /// Sequences as reported by `TERM=xterm-256color`.
    pub fn xterm() -> Self {
        let mut table: HashMap<String, String> = [
            ("colors", "256"),
            ("bold", "\x1b[1m"),
            ("cud1", "\n"),
            ("civis", "\x1b[?25l"),
            ("cuu1", "\x1b[A"),
            ("cnorm", "\x1b[?12l\x1b[?25h"),
            ("dl1", "\x1b[M"),
            ("kcud1", "\x1bOB"),
            ("smkx", "\x1b[?1h\x1b="),
            ("rmkx", "\x1b[?1l\x1b>"),
            ("sitm", "\x1b[3m"),
            ("sgr0", "\x1b(B\x1b[m"),
            ("smso", "\x1b[7m"),
            ("smul", "\x1b[4m"),
            ("kcuu1", "\x1bOA"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for n in 0..8 {
            table.insert(format!("setaf {}", n), format!("\x1b[3{}m", n));
            table.insert(format!("setab {}", n), format!("\x1b[4{}m", n));
        }

        Self::from_table(table)
    }

    /// Every capability resolves to `<capname>`, which keeps rendered
    /// output readable in assertions.
    pub fn symbolic() -> Self {
        let mut table: HashMap<String, String> = Codename::ALL
            .into_iter()
            .filter_map(|c| c.capname())
            .map(|capname| (capname.to_string(), format!("<{}>", capname)))
            .collect();
        table.insert("colors".to_string(), "8".to_string());
        Self::from_table(table)
    }

    fn from_table(table: HashMap<String, String>) -> Self {
        Self {
            table,
            failing: None,
            queries: Cell::new(0),
        }
    }

    /// Report `capname` as absent.
    pub fn without(mut self, capname: &str) -> Self {
        self.table.remove(capname);
        self
    }

    /// Override the raw `tput colors` output.
    pub fn with_colors(mut self, raw: &str) -> Self {
        self.table.insert("colors".to_string(), raw.to_string());
        self
    }

    /// Fail hard when `capname` is queried.
    pub fn failing_on(mut self, capname: &str) -> Self {
        self.failing = Some(capname.to_string());
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.get()
    }
}

impl TerminalCapabilityProvider for FixedProvider {
    fn query(&self, capname: &str) -> Result<Option<String>, CapabilityError> {
        self.queries.set(self.queries.get() + 1);
        if self.failing.as_deref() == Some(capname) {
            return Err(CapabilityError::QueryFailed {
                capname: capname.to_string(),
                status: "exit status: 3".to_string(),
                stderr: "unknown terminal".to_string(),
            });
        }
        Ok(self.table.get(capname).cloned())
    }
}

pub fn xterm_map() -> CapabilityMap {
    CapabilityMap::build(&FixedProvider::xterm()).expect("fixed table resolves")
}

pub fn symbolic_map() -> CapabilityMap {
    CapabilityMap::build(&FixedProvider::symbolic()).expect("fixed table resolves")
}

// ============================================================================
// TERMINAL DEVICE
// ============================================================================

pub const FAKE_ICANON: u32 = 0b0010;
pub const FAKE_ECHO: u32 = 0b1000;
const FAKE_ISIG: u32 = 0b0001;

/// Attribute configuration of a [`FakeDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeAttributes {
    pub lflag: u32,
    pub speed: u32,
}

/// In-memory terminal that records every attribute change.
pub struct FakeDevice {
    current: RefCell<FakeAttributes>,
    sets: Cell<usize>,
    fail_next_set: Cell<bool>,
    fail_reads: Cell<bool>,
}

impl FakeDevice {
    /// A cooked terminal: canonical mode, echo and signals on.
    pub fn new() -> Self {
        Self {
            current: RefCell::new(FakeAttributes {
                lflag: FAKE_ICANON | FAKE_ECHO | FAKE_ISIG,
                speed: 38400,
            }),
            sets: Cell::new(0),
            fail_next_set: Cell::new(false),
            fail_reads: Cell::new(false),
        }
    }

    pub fn current(&self) -> FakeAttributes {
        self.current.borrow().clone()
    }

    /// Number of `set_attributes` calls, including failed ones.
    pub fn set_count(&self) -> usize {
        self.sets.get()
    }

    pub fn fail_next_set(&self) {
        self.fail_next_set.set(true);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.set(true);
    }
}

impl TerminalDevice for FakeDevice {
    type Attributes = FakeAttributes;

    fn attributes(&self) -> io::Result<FakeAttributes> {
        if self.fail_reads.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "not a tty"));
        }
        Ok(self.current())
    }

    fn set_attributes(&self, attributes: &FakeAttributes) -> io::Result<()> {
        self.sets.set(self.sets.get() + 1);
        if self.fail_next_set.replace(false) {
            return Err(io::Error::new(io::ErrorKind::Other, "tcsetattr failed"));
        }
        *self.current.borrow_mut() = attributes.clone();
        Ok(())
    }

    fn menu_mode(attributes: &FakeAttributes) -> FakeAttributes {
        FakeAttributes {
            lflag: attributes.lflag & !(FAKE_ICANON | FAKE_ECHO),
            ..attributes.clone()
        }
    }
}

// ============================================================================
// INPUT
// ============================================================================

/// Replays a fixed list of reads, then reports end of input.
pub struct ScriptedInput {
    chunks: VecDeque<RawInput>,
}

impl ScriptedInput {
    pub fn new(chunks: Vec<RawInput>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }

    /// One read per key sequence.
    pub fn keys(keys: &[&[u8]]) -> Self {
        Self::new(keys.iter().map(|k| RawInput::Bytes(k.to_vec())).collect())
    }

    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl KeyInputSource for ScriptedInput {
    fn read_chunk(&mut self, max: usize) -> io::Result<RawInput> {
        match self.chunks.pop_front() {
            Some(RawInput::Bytes(mut bytes)) => {
                bytes.truncate(max);
                Ok(RawInput::Bytes(bytes))
            }
            Some(RawInput::Interrupted) => Ok(RawInput::Interrupted),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "script exhausted",
            )),
        }
    }
}

// ============================================================================
// SIGNALS
// ============================================================================

static SIGINT_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that register SIGINT handlers or raise SIGINT.
///
/// A raised signal wakes every live [`crate::input::TtyInput`] in the
/// process, so those tests must not overlap.
pub fn sigint_guard() -> MutexGuard<'static, ()> {
    SIGINT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
