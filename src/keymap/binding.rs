//! Keybinding struct mapping a keychord in a context to command text

use crate::context::ROOT_CONTEXT;

/// A single binding: `keychord` pressed while `context` is current runs `command`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    /// Dotted context name, e.g. `root` or `insert.prompt`
    pub context: String,
    /// Keychord name as produced by the input decoder
    pub keychord: String,
    /// Command text, parsed when the key is pressed
    pub command: String,
}

impl Keybinding {
    /// Create a binding in the root context
    pub fn new(keychord: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            context: ROOT_CONTEXT.to_string(),
            keychord: keychord.into(),
            command: command.into(),
        }
    }

    /// Move this binding to another context (builder pattern)
    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Name of the command this binding runs
    pub fn command_name(&self) -> &str {
        self.command.split_whitespace().next().unwrap_or_default()
    }
}
