//! The closed set of commands and their parameter rules

use std::fmt;
use std::str::FromStr;

use super::params::{parse_int, Params};
use crate::error::EditorError;
use crate::model::SplitAxis;
use crate::registry::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    // Cursor
    CursorMoveLine,
    CursorMoveOffset,
    CursorSet,

    // Editing
    InsertString,
    InsertLineBreak,
    InsertTab,
    DeleteCharBefore,
    DeleteCharAfter,

    // Bindings, variables, contexts
    KeyBind,
    Set,
    Unset,
    ContextPush,
    ContextPop,

    // Panes
    Split,
    Unsplit,
    FocusNext,

    // Session
    Status,
    Quit,
}

/// Command names as written in key bindings and scripts
const COMMAND_NAMES: &[(&str, CommandKind)] = &[
    ("cursor_move_line", CommandKind::CursorMoveLine),
    ("cursor_move_offset", CommandKind::CursorMoveOffset),
    ("cursor_set", CommandKind::CursorSet),
    ("insert_string", CommandKind::InsertString),
    ("insert_line_break", CommandKind::InsertLineBreak),
    ("insert_tab", CommandKind::InsertTab),
    ("delete_char_before", CommandKind::DeleteCharBefore),
    ("delete_char_after", CommandKind::DeleteCharAfter),
    ("key_bind", CommandKind::KeyBind),
    ("set", CommandKind::Set),
    ("unset", CommandKind::Unset),
    ("context_push", CommandKind::ContextPush),
    ("context_pop", CommandKind::ContextPop),
    ("split", CommandKind::Split),
    ("unsplit", CommandKind::Unsplit),
    ("focus_next", CommandKind::FocusNext),
    ("status", CommandKind::Status),
    ("quit", CommandKind::Quit),
];

/// Values a parameter falls back to when the command text omits it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDefaults {
    pub line: usize,
    pub column: usize,
    pub tab_stop: usize,
    pub split: SplitAxis,
}

impl CommandKind {
    pub fn name(self) -> &'static str {
        COMMAND_NAMES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        COMMAND_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
    }

    pub fn all() -> impl Iterator<Item = CommandKind> {
        COMMAND_NAMES.iter().map(|(_, kind)| *kind)
    }

    /// Normalize parsed parameters for this kind
    ///
    /// Positional forms are copied to their named equivalents, defaults are
    /// filled in, and values that must be numbers or scopes are checked, so
    /// execution only reads named parameters.
    pub fn parse_params(
        self,
        mut params: Params,
        defaults: &ParamDefaults,
    ) -> Result<Params, EditorError> {
        match self {
            CommandKind::CursorMoveLine | CommandKind::CursorMoveOffset => {
                promote(&mut params, "delta", 0);
                params.int("delta")?;
            }
            CommandKind::CursorSet => {
                promote(&mut params, "line", 0);
                promote(&mut params, "column", 1);
                params.set_default("line", "-");
                params.set_default("column", "-");
                for name in ["line", "column"] {
                    if let Some(value) = params.named(name).filter(|v| *v != "-") {
                        parse_int(name, value)?;
                    }
                }
            }
            CommandKind::InsertString => {
                if params.named("str").is_none() {
                    let text = params.positionals().collect::<Vec<_>>().join(" ");
                    params.set_default("str", text);
                }
                cursor_defaults(&mut params, defaults)?;
            }
            CommandKind::InsertLineBreak => {
                cursor_defaults(&mut params, defaults)?;
                params.set_default("str", "\n");
            }
            CommandKind::InsertTab => {
                cursor_defaults(&mut params, defaults)?;
                let column = params.int("offset")?.max(0) as usize;
                let tab_stop = defaults.tab_stop.max(1);
                params.set_default("str", " ".repeat(tab_stop - column % tab_stop));
            }
            CommandKind::DeleteCharBefore | CommandKind::DeleteCharAfter => {
                cursor_defaults(&mut params, defaults)?;
            }
            CommandKind::KeyBind => {
                for (index, name) in ["context", "keychord", "command"].into_iter().enumerate() {
                    promote(&mut params, name, index);
                    require(&params, self, name)?;
                }
            }
            CommandKind::Set | CommandKind::Unset => {
                promote(&mut params, "name", 0);
                require(&params, self, "name")?;
                if self == CommandKind::Set {
                    promote(&mut params, "value", 1);
                    params.set_default("value", "");
                }
                params.set_default("scope", Scope::Global.name());
                if let Some(scope) = params.named("scope") {
                    scope.parse::<Scope>()?;
                }
            }
            CommandKind::ContextPush => {
                promote(&mut params, "name", 0);
                require(&params, self, "name")?;
            }
            CommandKind::Split => {
                promote(&mut params, "axis", 0);
                promote(&mut params, "position", 1);
                let axis = match params.named("axis") {
                    Some(axis) => axis.parse::<SplitAxis>()?,
                    None => defaults.split,
                };
                let axis = match axis {
                    SplitAxis::Horizontal => "horizontal",
                    SplitAxis::Vertical => "vertical",
                };
                params.set_default("axis", axis);
                if let Some(position) = params.named("position") {
                    if parse_int("position", position)? < 0 {
                        return Err(EditorError::Parse(
                            "split position must not be negative".to_string(),
                        ));
                    }
                }
            }
            CommandKind::Status => {
                if params.named("text").is_none() {
                    let text = params.positionals().collect::<Vec<_>>().join(" ");
                    params.set_default("text", text);
                }
            }
            CommandKind::ContextPop
            | CommandKind::Unsplit
            | CommandKind::FocusNext
            | CommandKind::Quit => {}
        }
        Ok(params)
    }
}

/// Copy positional `index` to `name` unless `name` is already set
fn promote(params: &mut Params, name: &str, index: usize) {
    if let Some(value) = params.positional(index).map(str::to_string) {
        params.set_default(name, value);
    }
}

fn require(params: &Params, kind: CommandKind, name: &str) -> Result<(), EditorError> {
    match params.named(name) {
        Some(_) => Ok(()),
        None => Err(EditorError::Parse(format!(
            "{} requires a {} parameter",
            kind, name
        ))),
    }
}

/// `line` and `offset` default to the cursor and must be integers
fn cursor_defaults(params: &mut Params, defaults: &ParamDefaults) -> Result<(), EditorError> {
    params.set_default("line", defaults.line.to_string());
    params.set_default("offset", defaults.column.to_string());
    params.int("line")?;
    params.int("offset")?;
    Ok(())
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EditorError::Lookup(format!("unknown command: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: ParamDefaults = ParamDefaults {
        line: 2,
        column: 5,
        tab_stop: 4,
        split: SplitAxis::Vertical,
    };

    fn parse(kind: CommandKind, tokens: &[&str]) -> Result<Params, EditorError> {
        kind.parse_params(Params::parse(tokens.iter().map(|t| t.to_string())), &DEFAULTS)
    }

    #[test]
    fn test_names_round_trip() {
        for kind in CommandKind::all() {
            assert_eq!(CommandKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CommandKind::all().count(), COMMAND_NAMES.len());
        assert!(matches!(
            "no_such_command".parse::<CommandKind>(),
            Err(EditorError::Lookup(_))
        ));
    }

    #[test]
    fn test_insert_defaults_to_cursor() {
        let params = parse(CommandKind::InsertString, &["hello", "world"]).unwrap();
        assert_eq!(params.named("line"), Some("2"));
        assert_eq!(params.named("offset"), Some("5"));
        assert_eq!(params.named("str"), Some("hello world"));

        let params = parse(CommandKind::InsertString, &["-str", "x", "-line=0"]).unwrap();
        assert_eq!(params.named("str"), Some("x"));
        assert_eq!(params.named("line"), Some("0"));
    }

    #[test]
    fn test_insert_tab_pads_to_next_stop() {
        let params = parse(CommandKind::InsertTab, &[]).unwrap();
        assert_eq!(params.named("str"), Some("   "));
        let params = parse(CommandKind::InsertTab, &["-offset=8"]).unwrap();
        assert_eq!(params.named("str"), Some("    "));
    }

    #[test]
    fn test_cursor_move_requires_integer() {
        assert_eq!(
            parse(CommandKind::CursorMoveLine, &["-3"]).unwrap().int("delta").unwrap(),
            -3
        );
        assert!(matches!(
            parse(CommandKind::CursorMoveOffset, &["left"]),
            Err(EditorError::Parse(_))
        ));
        assert!(matches!(
            parse(CommandKind::CursorMoveOffset, &[]),
            Err(EditorError::Parse(_))
        ));
    }

    #[test]
    fn test_cursor_set_keeps_dashes() {
        let params = parse(CommandKind::CursorSet, &["-", "4"]).unwrap();
        assert_eq!(params.named("line"), Some("-"));
        assert_eq!(params.named("column"), Some("4"));
        assert_eq!(
            parse(CommandKind::CursorSet, &[]).unwrap().named("line"),
            Some("-")
        );
    }

    #[test]
    fn test_key_bind_requires_three_parts() {
        let params = parse(CommandKind::KeyBind, &["root", "ctrl-x", "quit"]).unwrap();
        assert_eq!(params.named("keychord"), Some("ctrl-x"));
        assert!(matches!(
            parse(CommandKind::KeyBind, &["root", "ctrl-x"]),
            Err(EditorError::Parse(_))
        ));
    }

    #[test]
    fn test_set_validates_scope() {
        let params = parse(CommandKind::Set, &["greeting", "hi"]).unwrap();
        assert_eq!(params.named("scope"), Some("global"));
        assert!(matches!(
            parse(CommandKind::Set, &["a", "b", "-scope=nowhere"]),
            Err(EditorError::Lookup(_))
        ));
    }

    #[test]
    fn test_split_axis_defaults_from_config() {
        let params = parse(CommandKind::Split, &[]).unwrap();
        assert_eq!(params.named("axis"), Some("vertical"));
        let params = parse(CommandKind::Split, &["h", "3"]).unwrap();
        assert_eq!(params.named("axis"), Some("h"));
        assert_eq!(params.named("position"), Some("3"));
        assert!(parse(CommandKind::Split, &["sideways"]).is_err());
    }
}
