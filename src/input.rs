//! Raw input decoding
//!
//! A terminal delivers keys as codes: single bytes for most keys, escape
//! sequences for arrows and function keys, and a six-byte report for mouse
//! events. [`InputDecoder`] walks a trie of known sequences and yields one
//! keychord name per call, e.g. `ctrl-a`, `up`, `alt-x` or `f5`.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Keychord emitted for a mouse report; details via [`InputDecoder::last_mouse`]
pub const MOUSE_KEYCHORD: &str = "mouse";

/// Keychord emitted when the terminal size changed
pub const RESIZE_KEYCHORD: &str = "resize";

/// Code a source yields to signal a terminal resize
pub const RESIZE_CODE: i32 = 410;

const ESCAPE: i32 = 27;

/// Single codes whose names replace whatever the generated tables assigned
const OVERRIDES: &[(i32, &str)] = &[
    (8, "backspace"),
    (9, "tab"),
    (13, "enter"),
    (28, "ctrl-f4"),
    (29, "ctrl-f5"),
    (30, "ctrl-f6"),
    (31, "ctrl-f7"),
    (32, "space"),
    (34, "double-quote"),
    (39, "single-quote"),
    (127, "backspace"),
    (258, "down"),
    (259, "up"),
    (260, "left"),
    (261, "right"),
    (262, "home"),
    (263, "backspace"),
    (330, "delete"),
    (331, "insert"),
    (338, "page-down"),
    (339, "page-up"),
    (343, "enter"),
    (350, "5"),
    (360, "end"),
    (RESIZE_CODE, RESIZE_KEYCHORD),
];

/// Sequences following ESC
const ESCAPE_SEQUENCES: &[(&str, &str)] = &[
    ("[A", "up"),
    ("[B", "down"),
    ("[C", "right"),
    ("[D", "left"),
    ("[E", "5"),
    ("[F", "end"),
    ("[G", "5"),
    ("[H", "home"),
    ("[M", MOUSE_KEYCHORD),
    ("[1~", "home"),
    ("[2~", "insert"),
    ("[3~", "delete"),
    ("[4~", "end"),
    ("[5~", "page-up"),
    ("[6~", "page-down"),
    ("[7~", "home"),
    ("[8~", "end"),
    ("[[A", "f1"),
    ("[[B", "f2"),
    ("[[C", "f3"),
    ("[[D", "f4"),
    ("[[E", "f5"),
    ("[11~", "f1"),
    ("[12~", "f2"),
    ("[13~", "f3"),
    ("[14~", "f4"),
    ("[15~", "f5"),
    ("[17~", "f6"),
    ("[18~", "f7"),
    ("[19~", "f8"),
    ("[20~", "f9"),
    ("[21~", "f10"),
    ("[23~", "f11"),
    ("[24~", "f12"),
    ("[25~", "f13"),
    ("[26~", "f14"),
    ("[28~", "f15"),
    ("[29~", "f16"),
    ("[31~", "f17"),
    ("[32~", "f18"),
    ("[33~", "f19"),
    ("[34~", "f20"),
    ("OA", "up"),
    ("OB", "down"),
    ("OC", "right"),
    ("OD", "left"),
    ("OH", "home"),
    ("OF", "end"),
    ("OP", "f1"),
    ("OQ", "f2"),
    ("OR", "f3"),
    ("OS", "f4"),
    ("Oo", "/"),
    ("Oj", "*"),
    ("Om", "-"),
    ("Ok", "+"),
    ("[Z", "shift-tab"),
];

/// Yields raw input codes one at a time; `None` means input is exhausted
pub trait CodeSource {
    fn read_code(&mut self) -> Option<i32>;
}

impl<F> CodeSource for F
where
    F: FnMut() -> Option<i32>,
{
    fn read_code(&mut self) -> Option<i32> {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Keychord(String),
    /// The codes read so far match no known sequence
    Unrecognized,
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Drag,
}

impl MouseAction {
    pub fn name(self) -> &'static str {
        match self {
            MouseAction::Down => "down",
            MouseAction::Up => "up",
            MouseAction::Drag => "drag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    Up,
    Down,
}

/// A decoded X10-style mouse report; `x` and `y` are zero-based cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReport {
    pub action: MouseAction,
    pub x: i32,
    pub y: i32,
    /// 1-3 for the primary buttons, 4+ for wheel; 0 on release
    pub button: i32,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    /// Set for wheel steps, which `button` and `action` cannot tell apart
    /// from a release
    pub wheel: Option<Wheel>,
}

impl MouseReport {
    /// Decode the three codes that follow `ESC [ M`
    pub fn decode(b0: i32, b1: i32, b2: i32) -> Self {
        let modifier = b0 - 32;
        let x = b1 - 33;
        let y = b2 - 33;

        let mut button = ((modifier & 64) / 64 * 3) + (modifier & 3) + 1;
        let action = if modifier & 3 != 0 {
            button = 0;
            MouseAction::Up
        } else if modifier & 2048 != 0 {
            MouseAction::Up
        } else if modifier & 32 != 0 {
            MouseAction::Drag
        } else {
            MouseAction::Down
        };

        Self {
            action,
            x,
            y,
            button,
            shift: modifier & 4 != 0,
            alt: modifier & 8 != 0,
            ctrl: modifier & 16 != 0,
            wheel: (modifier & 64 != 0).then_some(if modifier & 1 != 0 {
                Wheel::Down
            } else {
                Wheel::Up
            }),
        }
    }
}

#[derive(Debug, Clone)]
enum TrieNode {
    Branch(HashMap<i32, TrieNode>),
    Leaf(String),
}

type Trie = HashMap<i32, TrieNode>;

pub struct InputDecoder<S> {
    source: S,
    trie: Trie,
    last_mouse: Option<MouseReport>,
}

impl<S: CodeSource> InputDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            trie: build_trie(),
            last_mouse: None,
        }
    }

    /// Read codes until they spell a keychord
    ///
    /// There is no backtracking: the first code that leaves the trie makes
    /// the whole sequence unrecognized.
    pub fn next_keychord(&mut self) -> Decoded {
        let mut node = &self.trie;
        loop {
            let Some(code) = self.source.read_code() else {
                return Decoded::EndOfInput;
            };
            match node.get(&code) {
                None => {
                    tracing::debug!(code, "unrecognized input code");
                    return Decoded::Unrecognized;
                }
                Some(TrieNode::Branch(children)) => node = children,
                Some(TrieNode::Leaf(name)) => {
                    if name == MOUSE_KEYCHORD {
                        let mut codes = [0; 3];
                        for slot in &mut codes {
                            match self.source.read_code() {
                                Some(code) => *slot = code,
                                None => return Decoded::EndOfInput,
                            }
                        }
                        self.last_mouse = Some(MouseReport::decode(codes[0], codes[1], codes[2]));
                    }
                    return Decoded::Keychord(name.clone());
                }
            }
        }
    }

    pub fn last_mouse(&self) -> Option<MouseReport> {
        self.last_mouse
    }

}

fn build_trie() -> Trie {
    let mut trie = Trie::new();

    for code in 1..=26u8 {
        let letter = (b'a' + code - 1) as char;
        trie.insert(i32::from(code), TrieNode::Leaf(format!("ctrl-{}", letter)));
    }
    for code in 33..=126u8 {
        trie.insert(i32::from(code), TrieNode::Leaf((code as char).to_string()));
    }
    for code in 265..=276 {
        trie.insert(code, TrieNode::Leaf(format!("f{}", code - 264)));
    }
    for code in 277..=288 {
        trie.insert(code, TrieNode::Leaf(format!("shift-f{}", code - 276)));
    }

    let mut escaped = Trie::new();
    escaped.insert(32, TrieNode::Leaf("alt-space".to_string()));
    for code in 33..=126u8 {
        escaped.insert(
            i32::from(code),
            TrieNode::Leaf(format!("alt-{}", code as char)),
        );
    }
    for (sequence, name) in ESCAPE_SEQUENCES {
        insert_sequence(&mut escaped, sequence.as_bytes(), name);
    }
    trie.insert(ESCAPE, TrieNode::Branch(escaped));

    for &(code, name) in OVERRIDES {
        trie.insert(code, TrieNode::Leaf(name.to_string()));
    }
    trie
}

/// Insert a sequence, turning any leaf on its path into a branch
fn insert_sequence(trie: &mut Trie, sequence: &[u8], name: &str) {
    let Some((&last, path)) = sequence.split_last() else {
        return;
    };
    let mut node = trie;
    for &byte in path {
        let entry = node
            .entry(i32::from(byte))
            .or_insert_with(|| TrieNode::Branch(Trie::new()));
        if let TrieNode::Leaf(_) = entry {
            *entry = TrieNode::Branch(Trie::new());
        }
        node = match entry {
            TrieNode::Branch(children) => children,
            TrieNode::Leaf(_) => unreachable!("leaf replaced above"),
        };
    }
    node.insert(i32::from(last), TrieNode::Leaf(name.to_string()));
}

fn collect_names(trie: &Trie, names: &mut HashSet<String>) {
    for node in trie.values() {
        match node {
            TrieNode::Leaf(name) => {
                names.insert(name.clone());
            }
            TrieNode::Branch(children) => collect_names(children, names),
        }
    }
}

/// Whether the decoder can ever produce `name`
pub fn is_known_keychord(name: &str) -> bool {
    static NAMES: OnceLock<HashSet<String>> = OnceLock::new();
    NAMES
        .get_or_init(|| {
            let mut names = HashSet::new();
            collect_names(&build_trie(), &mut names);
            names
        })
        .contains(name)
}

/// Keychord names of the printable characters, with the character each types
///
/// Quotes have names of their own; every other printable character is its
/// own name.
pub fn printable_keychords() -> impl Iterator<Item = (String, char)> {
    (33..=126u8).map(|code| {
        let c = code as char;
        let name = OVERRIDES
            .iter()
            .find(|&&(override_code, _)| override_code == i32::from(code))
            .map(|&(_, name)| name.to_string())
            .unwrap_or_else(|| c.to_string());
        (name, c)
    })
}
