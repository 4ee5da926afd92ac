//! Default keybindings for the editor
//!
//! Named keys come from the keymap.yaml embedded at compile time. Printable
//! characters are bound to `insert_string` programmatically.

use super::binding::Keybinding;
use super::config::{load_keymap_file, parse_keymap_yaml, UNBOUND};
use crate::input::printable_keychords;

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Get the embedded default keymap YAML content
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Load and merge keymaps: defaults + user overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Printable characters insert themselves
/// 2. Embedded default keymap (compiled into binary)
/// 3. User config at ~/.config/quill/keymap.yaml
///
/// User bindings with `command: unbound` remove matching default bindings.
pub fn load_default_keymap() -> Vec<Keybinding> {
    let mut bindings = printable_bindings();

    match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(named) => {
            tracing::info!("Loaded embedded default keymap ({} bindings)", named.len());
            bindings = merge_bindings(bindings, named);
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            bindings = merge_bindings(bindings, default_bindings());
        }
    }

    if let Some(user_path) = crate::config_paths::keymap_file() {
        if user_path.exists() {
            match load_keymap_file(&user_path) {
                Ok(user_bindings) => {
                    tracing::info!(
                        "Merging user keymap from {} ({} bindings)",
                        user_path.display(),
                        user_bindings.len()
                    );
                    bindings = merge_bindings(bindings, user_bindings);
                }
                Err(e) => {
                    tracing::warn!("Failed to load user keymap from {}: {}", user_path.display(), e);
                }
            }
        }
    }

    bindings
}

/// Merge user bindings into base bindings
///
/// - Same context and keychord → replaces the base binding
/// - Command `unbound` → removes the matching base binding
/// - Otherwise → the binding is added
pub fn merge_bindings(base: Vec<Keybinding>, user: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for user_binding in user {
        let existing_idx = result.iter().position(|b| {
            b.context == user_binding.context && b.keychord == user_binding.keychord
        });

        if user_binding.command == UNBOUND {
            if let Some(idx) = existing_idx {
                result.remove(idx);
            }
            continue;
        }

        match existing_idx {
            Some(idx) => result[idx] = user_binding,
            None => result.push(user_binding),
        }
    }

    result
}

/// Every printable character inserts itself in the root context
pub fn printable_bindings() -> Vec<Keybinding> {
    printable_keychords()
        .map(|(keychord, c)| {
            let text = if c.is_ascii_alphanumeric() {
                c.to_string()
            } else {
                format!("\\{}", c)
            };
            Keybinding::new(keychord, format!("insert_string -str {}", text))
        })
        .collect()
}

/// Minimal named-key bindings used when the embedded keymap cannot be read
pub fn default_bindings() -> Vec<Keybinding> {
    vec![
        Keybinding::new("space", "insert_string -str ' '"),
        Keybinding::new("enter", "insert_line_break"),
        Keybinding::new("tab", "insert_tab"),
        Keybinding::new("backspace", "delete_char_before"),
        Keybinding::new("delete", "delete_char_after"),
        Keybinding::new("up", "cursor_move_line -1"),
        Keybinding::new("down", "cursor_move_line 1"),
        Keybinding::new("left", "cursor_move_offset -1"),
        Keybinding::new("right", "cursor_move_offset 1"),
        Keybinding::new("home", "cursor_set - 0"),
        Keybinding::new("ctrl-q", "quit"),
    ]
}
