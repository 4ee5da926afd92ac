//! quill - a small scriptable terminal text editor
//!
//! This crate provides the editing engine: a line-indexed text buffer, a
//! tree of split panes, a command pipeline driven by key bindings and
//! startup scripts, and a decoder for raw terminal input.

pub mod cli;
pub mod command;
pub mod config;
pub mod config_paths;
pub mod context;
pub mod error;
pub mod input;
pub mod keymap;
pub mod model;
pub mod registry;
pub mod render;
pub mod session;
pub mod tracing;

// Re-export commonly used types
pub use command::{Command, CommandKind, CommandParser, Outcome};
pub use config::EditorConfig;
pub use error::EditorError;
pub use input::{Decoded, InputDecoder};
pub use keymap::Keymap;
pub use model::{TextBuffer, ViewTree};
pub use session::Session;
