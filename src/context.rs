//! Input contexts and the environment commands evaluate against
//!
//! The context stack selects which key bindings apply: bindings are looked
//! up under the dotted name of the whole stack (`root` when empty).

use crate::command::tokenizer::VariableResolver;
use crate::command::CommandKind;
use crate::error::EditorError;
use crate::registry::{Registry, Scope, ScopeKey};

/// Context name used when the stack is empty
pub const ROOT_CONTEXT: &str = "root";

/// Identity of the control that owns keyboard input
pub const EDITOR_CONTROL: &str = "editor";

/// Whether `name` is a non-empty run of `[A-Za-z0-9_-]`
pub fn is_valid_context_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextStack {
    names: Vec<String>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) -> Result<(), EditorError> {
        if !is_valid_context_name(name) {
            return Err(EditorError::Validation(format!(
                "invalid context name: {:?}",
                name
            )));
        }
        self.names.push(name.to_string());
        tracing::debug!(context = %self.context_name(), "pushed context");
        Ok(())
    }

    pub fn pop(&mut self) -> Result<String, EditorError> {
        let name = self
            .names
            .pop()
            .ok_or_else(|| EditorError::Validation("context stack is empty".to_string()))?;
        tracing::debug!(context = %self.context_name(), "popped context");
        Ok(name)
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn context_name(&self) -> String {
        if self.names.is_empty() {
            ROOT_CONTEXT.to_string()
        } else {
            self.names.join(".")
        }
    }
}

/// Shared state a command sees besides the panes: the context stack, the
/// variable registry and the identities that key the control and command
/// scopes.
#[derive(Debug, Clone)]
pub struct Context {
    pub stack: ContextStack,
    pub registry: Registry,
    control: &'static str,
    command: Option<CommandKind>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            stack: ContextStack::new(),
            registry: Registry::new(),
            control: EDITOR_CONTROL,
            command: None,
        }
    }

    pub fn context_name(&self) -> String {
        self.stack.context_name()
    }

    pub fn control(&self) -> &'static str {
        self.control
    }

    pub fn current_command(&self) -> Option<CommandKind> {
        self.command
    }

    pub fn set_current_command(&mut self, command: Option<CommandKind>) {
        self.command = command;
    }

    /// Bind `scope` to the key it has right now
    pub fn scope_key(&self, scope: Scope) -> ScopeKey {
        match scope {
            Scope::Global => ScopeKey::global(),
            Scope::Context => ScopeKey::new(scope, self.context_name()),
            Scope::Control => ScopeKey::new(scope, self.control),
            Scope::Command => ScopeKey::new(
                scope,
                self.command.map(CommandKind::name).unwrap_or_default(),
            ),
        }
    }

    pub fn set_var(&mut self, name: &str, value: impl Into<String>, scope: Scope) {
        let key = self.scope_key(scope);
        self.registry.set(name, value, &key);
    }

    pub fn get_var(&self, name: &str, scope: Scope) -> Option<&str> {
        self.registry.get(name, &self.scope_key(scope))
    }

    pub fn clear_var(&mut self, name: &str, scope: Scope) -> Option<String> {
        let key = self.scope_key(scope);
        self.registry.clear(name, &key)
    }

    pub fn clear_scope(&mut self, scope: Scope) {
        let key = self.scope_key(scope);
        self.registry.clear_scope(&key);
    }
}

impl VariableResolver for Context {
    /// Variables in command text resolve against the control scope
    fn resolve(&self, token: &str) -> String {
        self.registry.evaluate(token, &self.scope_key(Scope::Control))
    }
}
