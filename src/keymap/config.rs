//! YAML configuration parsing for keymaps
//!
//! Parses keymap.yaml files into Keybinding structs.

use std::path::Path;

use serde::Deserialize;

use super::binding::Keybinding;
use crate::command::CommandKind;
use crate::context::{is_valid_context_name, ROOT_CONTEXT};
use crate::input::is_known_keychord;

/// Command text that removes a binding when merged over the defaults
pub const UNBOUND: &str = "unbound";

/// Root structure of a keymap YAML file
#[derive(Debug, Deserialize)]
pub struct KeymapConfig {
    pub bindings: Vec<BindingConfig>,
}

/// A single binding entry from YAML
#[derive(Debug, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    pub command: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Load keybindings from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<Vec<Keybinding>, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    parse_keymap_yaml(&content)
}

/// Parse keybindings from YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<Vec<Keybinding>, KeymapError> {
    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    config
        .bindings
        .into_iter()
        .map(|entry| {
            let context = entry.context.unwrap_or_else(|| ROOT_CONTEXT.to_string());
            validate_context(&context)?;
            validate_key(&entry.key)?;
            validate_command(&entry.command)?;
            Ok(Keybinding::new(entry.key, entry.command).in_context(context))
        })
        .collect()
}

fn validate_context(context: &str) -> Result<(), KeymapError> {
    if context.split('.').all(is_valid_context_name) {
        Ok(())
    } else {
        Err(KeymapError::InvalidContext(context.to_string()))
    }
}

fn validate_key(key: &str) -> Result<(), KeymapError> {
    if is_known_keychord(key) {
        Ok(())
    } else {
        Err(KeymapError::InvalidKey(key.to_string()))
    }
}

/// Only the command name is checked; parameters are parsed at key press
fn validate_command(command: &str) -> Result<(), KeymapError> {
    let name = command.split_whitespace().next().unwrap_or_default();
    if name == UNBOUND || CommandKind::from_name(name).is_some() {
        Ok(())
    } else {
        Err(KeymapError::InvalidCommand(command.to_string()))
    }
}

/// Errors that can occur when loading keymaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidCommand(String),
    InvalidContext(String),
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "IO error: {}", e),
            KeymapError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            KeymapError::InvalidCommand(c) => write!(f, "Invalid command: {}", c),
            KeymapError::InvalidContext(c) => write!(f, "Invalid context: {}", c),
        }
    }
}

impl std::error::Error for KeymapError {}
