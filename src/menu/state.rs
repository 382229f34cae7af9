//! Menu state algebra: pure types, zero effects.
//!
//! The selection state machine has one live state and two terminal ones.
//! Key presses are mapped to [`Action`]s before they reach the transition
//! function, so the state machine never sees raw input.

// ============================================================================
// SELECTION STATE
// ============================================================================

/// Where a menu session stands.
///
/// While `Active`, the index is always within `[0, entries)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Waiting for input; the highlighted entry.
    Active(usize),
    /// The user confirmed the entry at this index.
    Selected(usize),
    /// The user backed out (Escape or interrupt).
    Cancelled,
}

impl SelectionState {
    /// Initial state: first entry highlighted.
    pub fn start() -> Self {
        SelectionState::Active(0)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SelectionState::Active(_))
    }

    /// Final result of a finished session: `Some(index)` or no selection.
    ///
    /// Also `None` while still active.
    pub fn selection(&self) -> Option<usize> {
        match self {
            SelectionState::Selected(index) => Some(*index),
            SelectionState::Active(_) | SelectionState::Cancelled => None,
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::start()
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the highlight one entry up.
    MoveUp,
    /// Move the highlight one entry down.
    MoveDown,
    /// Confirm the highlighted entry.
    Select,
    /// Leave without a selection.
    Cancel,
}

// ============================================================================
// NAVIGATION
// ============================================================================

/// Bounds and edge policy for index movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    /// Number of entries; never zero for a running session.
    pub len: usize,
    /// Wrap past the ends instead of clamping.
    pub cycle: bool,
}

// ============================================================================
// TESTS
// ============================================================================
