//! Editor configuration and startup script resolution
//!
//! Preferences live in `~/.config/quill/config.yaml`. The startup script
//! (`quillrc`) is a list of commands run before the first key press.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::SplitAxis;
use crate::render::Color;

/// Startup script compiled into the binary, used when no other is found
pub const BUNDLED_RC: &str = include_str!("../quillrc");

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Columns between tab stops for `insert_tab`
    #[serde(default = "default_tab_stop")]
    pub tab_stop: usize,
    /// Width of the line-number gutter, in columns
    #[serde(default = "default_line_number_width")]
    pub line_number_width: usize,
    /// Axis used by `split` when none is given
    #[serde(default)]
    pub default_split: SplitAxis,
    #[serde(default = "default_gutter_color")]
    pub gutter_color: Color,
}

fn default_tab_stop() -> usize {
    4
}

fn default_line_number_width() -> usize {
    4
}

fn default_gutter_color() -> Color {
    Color::Yellow
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: default_tab_stop(),
            line_number_width: default_line_number_width(),
            default_split: SplitAxis::default(),
            gutter_color: default_gutter_color(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Where the startup script came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// Given with `-c`
    Explicit(PathBuf),
    User(PathBuf),
    System(PathBuf),
    Bundled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupScript {
    pub source: ScriptSource,
    pub text: String,
}

/// Pick the startup script: explicit path, then user, then system, then bundled
///
/// An explicit path that cannot be read is an error. Missing or unreadable
/// user and system scripts fall through to the next candidate.
pub fn resolve_startup_script(
    explicit: Option<&Path>,
    user: Option<&Path>,
    system: Option<&Path>,
) -> io::Result<StartupScript> {
    if let Some(path) = explicit {
        let text = std::fs::read_to_string(path)?;
        return Ok(StartupScript {
            source: ScriptSource::Explicit(path.to_path_buf()),
            text,
        });
    }

    let candidates = [
        user.map(|p| ScriptSource::User(p.to_path_buf())),
        system.map(|p| ScriptSource::System(p.to_path_buf())),
    ];
    for source in candidates.into_iter().flatten() {
        let path = match &source {
            ScriptSource::User(path) | ScriptSource::System(path) => path,
            _ => continue,
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::info!("Using startup script {}", path.display());
                return Ok(StartupScript { source, text });
            }
            Err(e) => tracing::debug!("Skipping startup script {}: {}", path.display(), e),
        }
    }

    Ok(StartupScript {
        source: ScriptSource::Bundled,
        text: BUNDLED_RC.to_string(),
    })
}
