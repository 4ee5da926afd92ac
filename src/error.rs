//! Errors raised by the command pipeline and the editing engine

use std::fmt;

/// Failure kinds surfaced to the session loop
///
/// Coordinate math on the buffer never fails; these cover everything
/// between a raw keychord and a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Malformed command text or parameters
    Parse(String),
    /// Unknown keychord binding, command name or scope
    Lookup(String),
    /// Rejected context name, or a pop on an empty context stack
    Validation(String),
    /// A well-formed command the editor cannot carry out, such as
    /// splitting a pane with no room for two halves
    Runtime(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Parse(m) => write!(f, "Parse error: {}", m),
            EditorError::Lookup(m) => write!(f, "Lookup error: {}", m),
            EditorError::Validation(m) => write!(f, "Validation error: {}", m),
            EditorError::Runtime(m) => write!(f, "Runtime error: {}", m),
        }
    }
}

impl std::error::Error for EditorError {}
