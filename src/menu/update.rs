//! Pure state transitions: (SelectionState, Action) -> SelectionState.
//!
//! Fully testable without a terminal. Terminal states absorb every action.

use super::state::{Action, Navigation, SelectionState};

/// Pure state transition function.
pub fn update(state: SelectionState, action: Action, nav: Navigation) -> SelectionState {
    let SelectionState::Active(index) = state else {
        return state;
    };

    match action {
        Action::MoveUp => SelectionState::Active(move_up(index, nav)),
        Action::MoveDown => SelectionState::Active(move_down(index, nav)),
        Action::Select => SelectionState::Selected(index),
        Action::Cancel => SelectionState::Cancelled,
    }
}

fn move_up(index: usize, nav: Navigation) -> usize {
    match index.checked_sub(1) {
        Some(previous) => previous,
        None if nav.cycle => nav.len.saturating_sub(1),
        None => 0,
    }
}

fn move_down(index: usize, nav: Navigation) -> usize {
    let next = index + 1;
    if next < nav.len {
        next
    } else if nav.cycle {
        0
    } else {
        nav.len.saturating_sub(1)
    }
}

// ============================================================================
// TESTS
// ============================================================================
