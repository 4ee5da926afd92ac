//! Keymap struct for storing and looking up keybindings

use std::collections::HashMap;

use super::binding::Keybinding;

/// Binding table: context name → keychord → command text
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    contexts: HashMap<String, HashMap<String, String>>,
}

impl Keymap {
    /// Create an empty keymap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keymap with the given bindings; later bindings win
    pub fn with_bindings(bindings: Vec<Keybinding>) -> Self {
        let mut keymap = Self::new();
        for binding in bindings {
            keymap.add_binding(binding);
        }
        keymap
    }

    pub fn add_binding(&mut self, binding: Keybinding) {
        self.bind(&binding.context, &binding.keychord, &binding.command);
    }

    /// Bind `keychord` in `context`, replacing any previous binding
    pub fn bind(&mut self, context: &str, keychord: &str, command: &str) {
        tracing::debug!(context, keychord, command, "bind key");
        self.contexts
            .entry(context.to_string())
            .or_default()
            .insert(keychord.to_string(), command.to_string());
    }

    pub fn unbind(&mut self, context: &str, keychord: &str) -> Option<String> {
        self.contexts.get_mut(context)?.remove(keychord)
    }

    /// Command text bound to `keychord` in exactly `context`
    pub fn lookup(&self, context: &str, keychord: &str) -> Option<&str> {
        self.contexts
            .get(context)?
            .get(keychord)
            .map(String::as_str)
    }

    /// Total number of bindings across all contexts
    pub fn len(&self) -> usize {
        self.contexts.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
