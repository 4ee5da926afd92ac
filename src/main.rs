use std::io;
use std::path::Path;

use anyhow::{Context as _, Result};
use clap::Parser;

use quill::cli::CliArgs;
use quill::config::{resolve_startup_script, EditorConfig};
use quill::config_paths;
use quill::input::InputDecoder;
use quill::keymap::{load_default_keymap, Keymap};
use quill::model::TextBuffer;
use quill::render::{PlainHighlighter, Surface};
use quill::Session;

mod runtime;

use runtime::{StdinSource, TerminalGuard, TerminalSurface};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    quill::tracing::init();

    let user_rc = config_paths::rc_file();
    let script = resolve_startup_script(
        args.rc.as_deref(),
        user_rc.as_deref(),
        Some(Path::new(config_paths::SYSTEM_RC_FILE)),
    )
    .with_context(|| match &args.rc {
        Some(path) => format!("could not read startup script {}", path.display()),
        None => "could not read startup script".to_string(),
    })?;
    tracing::info!(source = ?script.source, "startup script resolved");

    let config = EditorConfig::load();
    let keymap = Keymap::with_bindings(load_default_keymap());
    let buffer = match &args.file {
        Some(path) => load_file(path)?,
        None => TextBuffer::new(),
    };

    let mut session = Session::new(config, keymap, buffer);
    if let Some(path) = &args.file {
        session.set_title(&format!("quill - {}", path.display()));
    }

    let _guard = TerminalGuard::enter().context("could not set up the terminal")?;
    let mut surface = TerminalSurface::new();
    let (rows, cols) = surface.size();
    session.resize(rows, cols);

    let failures = session.run_startup(&script.text);
    if failures > 0 {
        session.set_status(&format!(
            "{} startup command(s) failed, see the log",
            failures
        ));
    }

    if let Some((line, column)) = args.initial_position() {
        session
            .views_mut()
            .set_cursor(line as isize, column as isize);
    }

    let mut decoder = InputDecoder::new(StdinSource::spawn()?);
    session.run(&mut decoder, &mut surface, &PlainHighlighter)?;

    tracing::info!("session ended");
    Ok(())
}

/// Read `path` into a buffer; a file that does not exist yet is empty
fn load_file(path: &Path) -> Result<TextBuffer> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(TextBuffer::from_text(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!("{} does not exist, starting empty", path.display());
            Ok(TextBuffer::new())
        }
        Err(e) => Err(e).with_context(|| format!("could not read {}", path.display())),
    }
}
