//! Scoped variable registry
//!
//! Variables live in one of four scopes. Each scope is further keyed: the
//! global scope has a single fixed key, the others are keyed by the current
//! context name, control identity or command name. Reads fall back to the
//! global scope.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EditorError;

/// Prefix marking a token as a variable reference
pub const VAR_PREFIX: char = '$';

/// Key of the single global scope
pub const GLOBAL_KEY: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Context,
    Control,
    Command,
}

impl Scope {
    pub fn name(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Context => "context",
            Scope::Control => "control",
            Scope::Command => "command",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scope {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Scope::Global),
            "context" => Ok(Scope::Context),
            "control" => Ok(Scope::Control),
            "command" => Ok(Scope::Command),
            _ => Err(EditorError::Lookup(format!("unknown scope: {}", s))),
        }
    }
}

/// A scope bound to a concrete key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub scope: Scope,
    pub key: String,
}

impl ScopeKey {
    pub fn new(scope: Scope, key: impl Into<String>) -> Self {
        Self {
            scope,
            key: key.into(),
        }
    }

    pub fn global() -> Self {
        Self::new(Scope::Global, GLOBAL_KEY)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    values: HashMap<ScopeKey, HashMap<String, String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>, key: &ScopeKey) {
        let value = value.into();
        tracing::debug!(scope = %key.scope, key = %key.key, name, value = %value, "set variable");
        self.values
            .entry(key.clone())
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Value in exactly this scope, without global fallback
    pub fn get(&self, name: &str, key: &ScopeKey) -> Option<&str> {
        self.values.get(key)?.get(name).map(String::as_str)
    }

    pub fn clear(&mut self, name: &str, key: &ScopeKey) -> Option<String> {
        self.values.get_mut(key)?.remove(name)
    }

    pub fn clear_scope(&mut self, key: &ScopeKey) {
        self.values.remove(key);
    }

    /// Resolve a `$name` token in `key`, falling back to the global scope
    ///
    /// Tokens without the prefix come back unchanged. Unknown variables
    /// resolve to the empty string.
    pub fn evaluate(&self, token: &str, key: &ScopeKey) -> String {
        let Some(name) = token.strip_prefix(VAR_PREFIX) else {
            tracing::warn!(token, "evaluated a token that is not a variable");
            return token.to_string();
        };

        if let Some(value) = self.get(name, key) {
            return value.to_string();
        }
        if let Some(value) = self.get(name, &ScopeKey::global()) {
            return value.to_string();
        }

        tracing::warn!(name, scope = %key.scope, key = %key.key, "undefined variable");
        String::new()
    }
}
