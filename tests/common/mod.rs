//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use quill::config::EditorConfig;
use quill::input::{CodeSource, InputDecoder};
use quill::keymap::{
    get_default_keymap_yaml, merge_bindings, parse_keymap_yaml, printable_bindings, Keymap,
};
use quill::model::TextBuffer;
use quill::render::MemorySurface;
use quill::Session;

pub const ROWS: usize = 12;
pub const COLS: usize = 40;

/// Bundled bindings only, so a user keymap on the test machine has no effect
pub fn default_keymap() -> Keymap {
    let named = parse_keymap_yaml(get_default_keymap_yaml()).expect("bundled keymap parses");
    Keymap::with_bindings(merge_bindings(printable_bindings(), named))
}

/// A session over `text`, laid out for a `ROWS` x `COLS` screen
pub fn test_session(text: &str) -> Session {
    let mut session = Session::new(
        EditorConfig::default(),
        default_keymap(),
        TextBuffer::from_text(text),
    );
    session.resize(ROWS, COLS);
    session
}

pub fn test_surface() -> MemorySurface {
    MemorySurface::new(ROWS, COLS)
}

/// A decoder reading the given codes, then reporting end of input
pub fn decoder(codes: &[i32]) -> InputDecoder<impl CodeSource> {
    let mut codes = codes.to_vec().into_iter();
    InputDecoder::new(move || codes.next())
}

/// Codes for typing `text` as plain printable keys
pub fn typed(text: &str) -> Vec<i32> {
    text.bytes().map(i32::from).collect()
}

/// Full buffer text of the focused pane
pub fn text(session: &Session) -> String {
    session.views().active_buffer().text().to_string()
}

pub fn cursor(session: &Session) -> (usize, usize) {
    let cursor = session.views().active_buffer_view().cursor();
    (cursor.line, cursor.column)
}
