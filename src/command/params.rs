//! Command parameters
//!
//! `-name=value` and `--name=value` set a named parameter, `-name value`
//! takes the following token as the value, and everything else is
//! positional, keyed by its index in the token list.

use std::collections::BTreeMap;

use crate::error::EditorError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    Named(String),
    /// Index of the token in the parameter list
    Positional(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<ParamKey, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut params = Self::new();
        let mut awaiting: Option<String> = None;

        for (index, token) in tokens.into_iter().enumerate() {
            if let Some(name) = awaiting.take() {
                params.values.insert(ParamKey::Named(name), token);
                continue;
            }
            match split_switch(&token) {
                Some((name, Some(value))) => {
                    params
                        .values
                        .insert(ParamKey::Named(name.to_string()), value.to_string());
                }
                Some((name, None)) => awaiting = Some(name.to_string()),
                None => {
                    params.values.insert(ParamKey::Positional(index), token);
                }
            }
        }

        if let Some(name) = awaiting {
            tracing::debug!(name, "switch without a value ignored");
        }
        params
    }

    pub fn get(&self, key: &ParamKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn named(&self, name: &str) -> Option<&str> {
        self.get(&ParamKey::Named(name.to_string()))
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.get(&ParamKey::Positional(index))
    }

    /// Positional values in token order
    pub fn positionals(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(|(key, value)| match key {
            ParamKey::Positional(_) => Some(value.as_str()),
            ParamKey::Named(_) => None,
        })
    }

    /// Fill `name` if it has no value yet
    pub fn set_default(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .entry(ParamKey::Named(name.to_string()))
            .or_insert_with(|| value.into());
    }

    /// Parse a named parameter as a signed integer
    pub fn int(&self, name: &str) -> Result<isize, EditorError> {
        let value = self
            .named(name)
            .ok_or_else(|| EditorError::Parse(format!("missing parameter: {}", name)))?;
        parse_int(name, value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn parse_int(name: &str, value: &str) -> Result<isize, EditorError> {
    value.trim().parse().map_err(|_| {
        EditorError::Parse(format!("parameter {} expects an integer, got {:?}", name, value))
    })
}

/// Recognize `-name`, `--name`, `-name=value` and `--name=value`
fn split_switch(token: &str) -> Option<(&str, Option<&str>)> {
    let body = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))?;
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };

    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, value))
}
