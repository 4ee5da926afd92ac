//! Logging setup
//!
//! The terminal belongs to the editor while it runs, so logs go only to a
//! daily-rotated file under `~/.config/quill/logs/`.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=quill::model=debug` - module-level filtering
//!
//! The default level is `warn`, which records failing startup commands and
//! undefined variables.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize file logging
///
/// Returns false when no log directory is available; logging is then off.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let logs_dir = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => logs_dir,
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            return false;
        }
    };

    let file_appender = tracing_appender::rolling::daily(logs_dir, "quill.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).init();
    true
}
