//! simple-term-menu: Interactive single-selection menu for the terminal.

pub mod capability;
pub mod error;
pub mod input;
pub mod logging;
pub mod menu;
pub mod terminal;
pub mod types;

#[cfg(test)]
mod test_support;
