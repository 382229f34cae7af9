//! Interactive selection menu.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (SelectionState, Action, Navigation)
//! - `update`: Pure state transitions
//! - `view`: Rendering through capability sequences
//! - `run`: Effects (terminal mode, key input, event loop)

pub mod run;
pub mod state;
pub mod update;
pub mod view;

pub use run::{exit_status, map_key, Menu};
pub use state::{Action, Navigation, SelectionState};
