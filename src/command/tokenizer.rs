//! Shell-like tokenizer for command text
//!
//! Whitespace separates tokens outside quotes. Single and double quotes
//! group text and do not nest: inside one kind, the other is literal.
//! A backslash makes the next character literal. Tokens starting with an
//! unescaped `$` are variable references and are replaced by their value
//! when a resolver is attached.

use crate::error::EditorError;
use crate::registry::VAR_PREFIX;

/// Looks up the value of a `$name` token
pub trait VariableResolver {
    fn resolve(&self, token: &str) -> String;
}

#[derive(Default)]
pub struct Tokenizer<'a> {
    resolver: Option<&'a dyn VariableResolver>,
}

/// Token under construction
#[derive(Default)]
struct Pending {
    text: String,
    is_variable: bool,
}

impl<'a> Tokenizer<'a> {
    /// A tokenizer that leaves `$` tokens untouched
    pub fn new() -> Self {
        Self { resolver: None }
    }

    pub fn with_resolver(resolver: &'a dyn VariableResolver) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    /// Split `input` into at most `max` tokens
    ///
    /// Once `max` tokens exist, the rest of the input (starting with the
    /// whitespace that ended the last token) is appended verbatim to it.
    pub fn tokenize(&self, input: &str, max: Option<usize>) -> Result<Vec<String>, EditorError> {
        let mut tokens = Vec::new();
        let mut pending = Pending::default();
        let mut quote: Option<char> = None;
        let mut escaped = false;

        for (index, c) in input.char_indices() {
            if escaped {
                pending.text.push(c);
                escaped = false;
                continue;
            }

            if quote.is_none() && c.is_whitespace() {
                if pending.text.is_empty() {
                    continue;
                }
                self.finish(&mut tokens, &mut pending);
                let is_last = index + c.len_utf8() == input.len();
                if max == Some(tokens.len()) && !is_last {
                    if let Some(last) = tokens.last_mut() {
                        last.push_str(&input[index..]);
                    }
                    return Ok(tokens);
                }
                continue;
            }

            if Some(c) == quote {
                quote = None;
                continue;
            }
            if c == '\\' {
                escaped = true;
                continue;
            }
            if quote.is_none() && (c == '\'' || c == '"') {
                quote = Some(c);
                continue;
            }

            pending.text.push(c);
            if c == VAR_PREFIX && pending.text.len() == 1 {
                pending.is_variable = true;
            }
        }

        if escaped {
            return Err(EditorError::Parse(format!("trailing escape in: {}", input)));
        }
        if let Some(q) = quote {
            return Err(EditorError::Parse(format!("unterminated {} quote in: {}", q, input)));
        }
        if !pending.text.is_empty() {
            self.finish(&mut tokens, &mut pending);
        }
        Ok(tokens)
    }

    fn finish(&self, tokens: &mut Vec<String>, pending: &mut Pending) {
        let Pending { text, is_variable } = std::mem::take(pending);
        let token = match self.resolver {
            Some(resolver) if is_variable && text.len() > 1 => resolver.resolve(&text),
            _ => text,
        };
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Vars(HashMap<&'static str, &'static str>);

    impl VariableResolver for Vars {
        fn resolve(&self, token: &str) -> String {
            let name = token.trim_start_matches('$');
            self.0.get(name).copied().unwrap_or_default().to_string()
        }
    }

    fn tokens(input: &str) -> Vec<String> {
        Tokenizer::new().tokenize(input, None).unwrap()
    }

    #[test]
    fn test_whitespace_separates() {
        assert_eq!(tokens("  a  bb\tccc \n"), vec!["a", "bb", "ccc"]);
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn test_quotes_group_and_do_not_nest() {
        assert_eq!(tokens(r#"say "hello world""#), vec!["say", "hello world"]);
        assert_eq!(tokens(r#"'it"s' "it's""#), vec![r#"it"s"#, "it's"]);
        assert_eq!(tokens(r#"a"b c"d"#), vec!["ab cd"]);
    }

    #[test]
    fn test_empty_quotes_produce_no_token() {
        assert_eq!(tokens(r#"a "" b"#), vec!["a", "b"]);
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(tokens(r#"a\ b \"q\" \\"#), vec!["a b", "\"q\"", "\\"]);
    }

    #[test]
    fn test_unterminated_input_is_a_parse_error() {
        let tokenizer = Tokenizer::new();
        assert!(matches!(
            tokenizer.tokenize("say \"oops", None),
            Err(EditorError::Parse(_))
        ));
        assert!(matches!(
            tokenizer.tokenize("trailing\\", None),
            Err(EditorError::Parse(_))
        ));
    }

    #[test]
    fn test_max_appends_remainder_verbatim() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize("insert_string  -str \"a b\"", Some(1)).unwrap(),
            vec!["insert_string  -str \"a b\""]
        );
        assert_eq!(
            tokenizer.tokenize("cmd one two", Some(2)).unwrap(),
            vec!["cmd", "one two"]
        );
        assert_eq!(tokenizer.tokenize("cmd one ", Some(2)).unwrap(), vec!["cmd", "one"]);
    }

    #[test]
    fn test_variables_resolve_through_resolver() {
        let vars = Vars(HashMap::from([("name", "quill"), ("empty", "")]));
        let tokenizer = Tokenizer::with_resolver(&vars);
        assert_eq!(
            tokenizer.tokenize("hi $name '$name' \\$name $ a$name", None).unwrap(),
            vec!["hi", "quill", "quill", "$name", "$", "a$name"]
        );
        assert_eq!(tokenizer.tokenize("$missing", None).unwrap(), vec![""]);
    }

    #[test]
    fn test_variables_untouched_without_resolver() {
        assert_eq!(tokens("$name"), vec!["$name"]);
    }
}
