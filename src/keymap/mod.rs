//! Configurable keyboard mapping
//!
//! Keychord names produced by the input decoder map to command text, per
//! input context:
//!
//! ```text
//! InputDecoder → keychord → Keymap::lookup(context, keychord) → command text
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! // Embedded defaults merged with ~/.config/quill/keymap.yaml
//! let keymap = Keymap::with_bindings(load_default_keymap());
//! ```

mod binding;
mod config;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;

pub use binding::Keybinding;
pub use config::{load_keymap_file, parse_keymap_yaml, KeymapError, UNBOUND};
pub use defaults::{
    default_bindings, get_default_keymap_yaml, load_default_keymap, merge_bindings,
    printable_bindings,
};
pub use keymap::Keymap;
