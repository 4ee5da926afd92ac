//! Command pipeline
//!
//! Text such as `insert_string -str "hi"` becomes a [`Command`]: a kind from
//! the closed set in [`kind`], plus normalized [`Params`]. Commands run
//! against the [`Session`] that owns the panes, context and bindings.

pub mod kind;
pub mod params;
pub mod parser;
pub mod tokenizer;

use std::fmt;

pub use kind::{CommandKind, ParamDefaults};
pub use params::{ParamKey, Params};
pub use parser::CommandParser;
pub use tokenizer::{Tokenizer, VariableResolver};

use crate::context::is_valid_context_name;
use crate::error::EditorError;
use crate::model::SplitAxis;
use crate::registry::Scope;
use crate::session::Session;

/// What a finished command asks of the session loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going; the value is published as the global `_`
    Done(String),
    /// Leave the loop
    Halt,
}

#[derive(Debug, Clone)]
pub struct Command {
    kind: CommandKind,
    params: Params,
    raw: String,
    /// Context name when the command was parsed
    context: String,
    /// Control the command was parsed for
    receiver: &'static str,
}

impl Command {
    pub fn new(
        kind: CommandKind,
        params: Params,
        raw: String,
        context: String,
        receiver: &'static str,
    ) -> Self {
        Self {
            kind,
            params,
            raw,
            context,
            receiver,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn receiver(&self) -> &'static str {
        self.receiver
    }

    pub fn execute(&self, session: &mut Session) -> Result<Outcome, EditorError> {
        let p = &self.params;
        match self.kind {
            CommandKind::CursorMoveLine => {
                let delta = p.int("delta")?;
                let (view, buffer) = session.views.active_parts();
                view.move_cursor_line(buffer, delta);
                Ok(cursor_offset(session))
            }
            CommandKind::CursorMoveOffset => {
                let delta = p.int("delta")?;
                let (view, buffer) = session.views.active_parts();
                view.move_cursor_offset(buffer, delta);
                Ok(cursor_offset(session))
            }
            CommandKind::CursorSet => {
                let cursor = session.views.active_buffer_view().cursor();
                let line = coordinate(p, "line", cursor.line)?;
                let column = coordinate(p, "column", cursor.column)?;
                let (view, buffer) = session.views.active_parts();
                view.set_cursor(buffer, line, column);
                view.sync_target_column();
                Ok(cursor_offset(session))
            }
            CommandKind::InsertString | CommandKind::InsertLineBreak | CommandKind::InsertTab => {
                let text = p.named("str").unwrap_or_default();
                Ok(splice(session, p.int("line")?, p.int("offset")?, text, 0))
            }
            CommandKind::DeleteCharBefore => {
                let line = p.int("line")?;
                let offset = p.int("offset")?;
                if line < 1 && offset < 1 {
                    return Ok(cursor_offset(session));
                }
                Ok(splice(session, line, offset - 1, "", 1))
            }
            CommandKind::DeleteCharAfter => {
                Ok(splice(session, p.int("line")?, p.int("offset")?, "", 1))
            }
            CommandKind::KeyBind => {
                let context = required(p, "context")?;
                if !context.split('.').all(is_valid_context_name) {
                    return Err(EditorError::Validation(format!(
                        "invalid context name: {:?}",
                        context
                    )));
                }
                let keychord = required(p, "keychord")?;
                let command = required(p, "command")?;
                session.keymap.bind(context, keychord, command);
                Ok(Outcome::Done(command.to_string()))
            }
            CommandKind::Set => {
                let name = required(p, "name")?;
                let value = p.named("value").unwrap_or_default();
                session.context.set_var(name, value, scope(p)?);
                Ok(Outcome::Done(value.to_string()))
            }
            CommandKind::Unset => {
                let name = required(p, "name")?;
                let previous = session.context.clear_var(name, scope(p)?);
                Ok(Outcome::Done(previous.unwrap_or_default()))
            }
            CommandKind::ContextPush => {
                session.context.stack.push(required(p, "name")?)?;
                Ok(Outcome::Done(session.context.context_name()))
            }
            CommandKind::ContextPop => {
                let name = session.context.stack.pop()?;
                Ok(Outcome::Done(name))
            }
            CommandKind::Split => {
                let axis: SplitAxis = required(p, "axis")?.parse()?;
                let rect = session.views.active_buffer_view().rect();
                if axis.extent(rect) < 2 {
                    return Err(EditorError::Runtime(format!(
                        "pane is too small to split {}",
                        required(p, "axis")?
                    )));
                }
                let position = match p.named("position") {
                    Some(_) => Some(p.int("position")?.max(0) as usize),
                    None => None,
                };
                session.views.split(axis, position);
                Ok(Outcome::Done(session.views.leaves().len().to_string()))
            }
            CommandKind::Unsplit => {
                session.views.unsplit();
                Ok(Outcome::Done(session.views.leaves().len().to_string()))
            }
            CommandKind::FocusNext => {
                let leaf = session.views.focus_next();
                Ok(Outcome::Done(leaf.0.to_string()))
            }
            CommandKind::Status => {
                let text = p.named("text").unwrap_or_default();
                session.set_status(text);
                Ok(Outcome::Done(text.to_string()))
            }
            CommandKind::Quit => Ok(Outcome::Halt),
        }
    }

    /// Reverting is not supported; every kind undoes to a no-op
    pub fn undo(&self, _session: &mut Session) -> Result<(), EditorError> {
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.raw)
        }
    }
}

fn required<'p>(params: &'p Params, name: &str) -> Result<&'p str, EditorError> {
    params
        .named(name)
        .ok_or_else(|| EditorError::Parse(format!("missing parameter: {}", name)))
}

fn scope(params: &Params) -> Result<Scope, EditorError> {
    params.named("scope").unwrap_or("global").parse()
}

/// A `cursor_set` coordinate; `-` keeps the current value
fn coordinate(params: &Params, name: &str, current: usize) -> Result<isize, EditorError> {
    match params.named(name) {
        None | Some("-") => Ok(current as isize),
        Some(_) => params.int(name),
    }
}

/// Splice the focused buffer and move the cursor to the end of the edit
fn splice(session: &mut Session, line: isize, column: isize, text: &str, delete: isize) -> Outcome {
    let splice = session.views.splice(line, column, text, delete);
    let (view, buffer) = session.views.active_parts();
    view.set_cursor(buffer, splice.line as isize, splice.column as isize);
    view.sync_target_column();
    Outcome::Done(splice.offset.to_string())
}

fn cursor_offset(session: &Session) -> Outcome {
    let cursor = session.views.active_buffer_view().cursor();
    let offset = session
        .views
        .active_buffer()
        .offset(cursor.line as isize, cursor.column as isize);
    Outcome::Done(offset.to_string())
}
