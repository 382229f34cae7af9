//! Terminal capability resolution.
//!
//! Maps symbolic codenames to the escape sequences of the running terminal
//! and back. The lookup is built once per [`CapabilityContext`]; the
//! renderer and the key decoder borrow the resulting [`CapabilityMap`].
//!
//! Structure:
//! - Provider trait: where sequences come from (`tput`, or a fixed table in tests)
//! - Map: the resolved, immutable codename <-> sequence tables
//! - Context: lazy, idempotent construction of the map

use std::cell::OnceCell;
use std::collections::HashMap;
use std::process::Command;

use crate::error::CapabilityError;
use crate::types::Codename;

/// terminfo capability holding the number of supported colors.
const COLORS_CAPNAME: &str = "colors";

/// Color codenames resolve to nothing below this many colors.
const MIN_COLORS: u32 = 8;

/// `tput` exit status meaning "the terminal lacks this capability".
const TPUT_ABSENT_STATUS: i32 = 1;

// ============================================================================
// PROVIDERS
// ============================================================================

/// Source of raw capability strings for the current terminal.
pub trait TerminalCapabilityProvider {
    /// Query one capability, e.g. `"cuu1"` or `"setaf 1"`.
    ///
    /// Returns `Ok(None)` when the terminal does not have the capability.
    ///
    /// # Errors
    /// Any failure other than an absent capability.
    fn query(&self, capname: &str) -> Result<Option<String>, CapabilityError>;
}

/// Queries the terminfo database through the `tput` utility.
#[derive(Debug, Default, Clone, Copy)]
pub struct TputProvider;

impl TerminalCapabilityProvider for TputProvider {
    fn query(&self, capname: &str) -> Result<Option<String>, CapabilityError> {
        let output = Command::new("tput")
            .args(capname.split_whitespace())
            .output()
            .map_err(CapabilityError::Spawn)?;

        match output.status.code() {
            Some(0) => Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned())),
            Some(TPUT_ABSENT_STATUS) => Ok(None),
            _ => Err(CapabilityError::QueryFailed {
                capname: capname.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

// ============================================================================
// CAPABILITY MAP
// ============================================================================

/// Resolved codename <-> escape sequence tables. Immutable once built.
#[derive(Debug, Clone)]
pub struct CapabilityMap {
    sequences: HashMap<Codename, String>,
    codenames: HashMap<String, Codename>,
    colors: u32,
}

impl CapabilityMap {
    /// Query every known codename from `provider`.
    ///
    /// Absent capabilities become empty sequences. Colors become empty
    /// sequences when the terminal reports fewer than 8 colors.
    ///
    /// # Errors
    /// The first provider failure, or an unparsable color count.
    pub fn build<P>(provider: &P) -> Result<Self, CapabilityError>
    where
        P: TerminalCapabilityProvider + ?Sized,
    {
        let colors = query_colors(provider)?;
        if colors < MIN_COLORS {
            log::warn!("terminal reports {} colors, color styles disabled", colors);
        }

        let mut sequences = HashMap::with_capacity(Codename::ALL.len());
        for codename in Codename::ALL {
            let sequence = if let Some(fixed) = codename.control_sequence() {
                fixed.to_string()
            } else if codename.is_color() && colors < MIN_COLORS {
                String::new()
            } else if let Some(capname) = codename.capname() {
                provider.query(capname)?.unwrap_or_default()
            } else {
                String::new()
            };
            log::debug!("capability {} = {:?}", codename, sequence);
            sequences.insert(codename, sequence);
        }

        Ok(Self::from_sequences(sequences, colors))
    }

    /// Assemble a map from already-resolved sequences.
    ///
    /// Input keys take precedence in the reverse table: on many terminals
    /// `cursor_down` is a bare line feed, the same byte as `enter`.
    pub fn from_sequences(sequences: HashMap<Codename, String>, colors: u32) -> Self {
        let mut codenames = HashMap::with_capacity(sequences.len());

        let (keys, outputs): (Vec<_>, Vec<_>) = Codename::ALL
            .into_iter()
            .partition(|codename| codename.is_input_key());

        for codename in outputs.into_iter().chain(keys) {
            match sequences.get(&codename) {
                Some(sequence) if !sequence.is_empty() => {
                    codenames.insert(sequence.clone(), codename);
                }
                _ => {}
            }
        }

        Self {
            sequences,
            codenames,
            colors,
        }
    }

    /// Escape sequence for `codename`; empty when the terminal lacks it.
    pub fn resolve(&self, codename: Codename) -> &str {
        self.sequences.get(&codename).map(String::as_str).unwrap_or("")
    }

    /// Reverse lookup: which codename produces exactly `sequence`.
    pub fn lookup(&self, sequence: &str) -> Option<Codename> {
        self.codenames.get(sequence).copied()
    }

    /// Number of colors the terminal reported.
    pub fn colors(&self) -> u32 {
        self.colors
    }
}

fn query_colors<P>(provider: &P) -> Result<u32, CapabilityError>
where
    P: TerminalCapabilityProvider + ?Sized,
{
    let Some(raw) = provider.query(COLORS_CAPNAME)? else {
        return Ok(0);
    };
    let trimmed = raw.trim();
    let count: i64 = trimmed
        .parse()
        .map_err(|_| CapabilityError::InvalidColorCount(trimmed.to_string()))?;

    // ncurses prints -1 for terminals without color support
    Ok(u32::try_from(count).unwrap_or(0))
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Lazily built capability lookup, shared by reference for a whole process.
///
/// The provider is queried on first use only; later calls are pure lookups
/// against the cached [`CapabilityMap`].
pub struct CapabilityContext<P> {
    provider: P,
    map: OnceCell<CapabilityMap>,
}

impl<P: TerminalCapabilityProvider> CapabilityContext<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            map: OnceCell::new(),
        }
    }

    /// The resolved map, built on first call.
    ///
    /// # Errors
    /// A fatal provider failure. Nothing is cached in that case.
    pub fn map(&self) -> Result<&CapabilityMap, CapabilityError> {
        if let Some(map) = self.map.get() {
            return Ok(map);
        }
        log::debug!("resolving terminal capabilities");
        let map = CapabilityMap::build(&self.provider)?;
        Ok(self.map.get_or_init(|| map))
    }

    /// Escape sequence for `codename`, resolving the map if needed.
    ///
    /// # Errors
    /// See [`CapabilityContext::map`].
    pub fn resolve(&self, codename: Codename) -> Result<&str, CapabilityError> {
        Ok(self.map()?.resolve(codename))
    }

    /// Whether the map has already been built.
    pub fn is_resolved(&self) -> bool {
        self.map.get().is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================
