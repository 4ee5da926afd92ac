//! Runtime module - terminal integration
//!
//! This module contains the platform code for running the editor in a
//! terminal:
//! - `terminal` - raw mode guard, crossterm-backed surface, stdin code source

pub mod terminal;

pub use terminal::{StdinSource, TerminalGuard, TerminalSurface};
