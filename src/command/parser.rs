//! Turning keychords and command text into commands

use super::kind::{CommandKind, ParamDefaults};
use super::params::Params;
use super::tokenizer::Tokenizer;
use super::Command;
use crate::context::Context;
use crate::error::EditorError;
use crate::keymap::Keymap;

/// Resolves command text against the current context and bindings
pub struct CommandParser<'a> {
    context: &'a Context,
    keymap: &'a Keymap,
    defaults: ParamDefaults,
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a Context, keymap: &'a Keymap, defaults: ParamDefaults) -> Self {
        Self {
            context,
            keymap,
            defaults,
        }
    }

    /// Look up the command bound to `keychord` in the current context
    pub fn from_keychord(&self, keychord: &str) -> Result<Command, EditorError> {
        let context = self.context.context_name();
        let text = self.keymap.lookup(&context, keychord).ok_or_else(|| {
            EditorError::Lookup(format!("{} is not bound in {}", keychord, context))
        })?;
        self.from_string(text)
    }

    /// Parse `name params...`
    ///
    /// The name is the first word. The rest is handed to the tokenizer
    /// verbatim, with variable references resolved.
    pub fn from_string(&self, text: &str) -> Result<Command, EditorError> {
        let text = text.trim_start();
        // Same split as tokenizing with a cap of two, except the remainder
        // keeps its quotes for the parameter tokenizer below
        let (name, raw) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));
        if name.is_empty() {
            return Err(EditorError::Parse("empty command".to_string()));
        }
        let name = Tokenizer::new()
            .tokenize(name, None)?
            .into_iter()
            .next()
            .unwrap_or_default();

        let kind: CommandKind = name.parse()?;
        let tokens = Tokenizer::with_resolver(self.context).tokenize(raw, None)?;
        let params = kind.parse_params(Params::parse(tokens), &self.defaults)?;

        tracing::debug!(command = %kind, raw, "parsed command");
        Ok(Command::new(
            kind,
            params,
            raw.trim().to_string(),
            self.context.context_name(),
            self.context.control(),
        ))
    }
}
