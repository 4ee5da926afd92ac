//! Command pipeline tests - tokenizing, parsing, resolution and execution

mod common;

use common::{cursor, test_session, text};
use quill::command::{CommandKind, CommandParser, Outcome, ParamDefaults, Tokenizer};
use quill::context::Context;
use quill::keymap::Keymap;
use quill::model::SplitAxis;
use quill::registry::Scope;
use quill::EditorError;

const DEFAULTS: ParamDefaults = ParamDefaults {
    line: 0,
    column: 0,
    tab_stop: 4,
    split: SplitAxis::Vertical,
};

fn tokens(input: &str, max: Option<usize>) -> Vec<String> {
    Tokenizer::new().tokenize(input, max).unwrap()
}

// ========================================================================
// Tokenizer
// ========================================================================

#[test]
fn test_max_appends_the_rest_verbatim() {
    assert_eq!(
        tokens("insert_string -str  'a b'", Some(2)),
        vec!["insert_string", "-str  'a b'"]
    );
    assert_eq!(tokens("a b c d", Some(3)), vec!["a", "b", "c d"]);
    assert_eq!(tokens("a b", Some(2)), vec!["a", "b"]);
    assert_eq!(tokens("a b ", Some(2)), vec!["a", "b"]);
}

#[test]
fn test_variables_resolve_through_the_context() {
    let mut context = Context::new();
    context.set_var("who", "world", Scope::Global);
    context.set_var("mode", "insert", Scope::Control);

    let tokenizer = Tokenizer::with_resolver(&context);
    assert_eq!(
        tokenizer.tokenize("hello $who $mode $missing", None).unwrap(),
        vec!["hello", "world", "insert", ""]
    );
}

#[test]
fn test_escaped_and_lone_dollars_stay_literal() {
    let context = Context::new();
    let tokenizer = Tokenizer::with_resolver(&context);
    assert_eq!(
        tokenizer.tokenize(r"\$who $ a$b", None).unwrap(),
        vec!["$who", "$", "a$b"]
    );
}

#[test]
fn test_variable_flag_does_not_leak_into_next_token() {
    let mut context = Context::new();
    context.set_var("x", "1", Scope::Global);
    let tokenizer = Tokenizer::with_resolver(&context);
    assert_eq!(
        tokenizer.tokenize("$x plain", None).unwrap(),
        vec!["1", "plain"]
    );
}

// ========================================================================
// Parser
// ========================================================================

#[test]
fn test_from_string_builds_named_params() {
    let context = Context::new();
    let keymap = Keymap::new();
    let parser = CommandParser::new(&context, &keymap, DEFAULTS);

    let command = parser.from_string("insert_string -str 'a  b' -line=2").unwrap();
    assert_eq!(command.kind(), CommandKind::InsertString);
    assert_eq!(command.params().named("str"), Some("a  b"));
    assert_eq!(command.params().named("line"), Some("2"));
    assert_eq!(command.params().named("offset"), Some("0"));
    assert_eq!(command.context(), "root");
    assert_eq!(command.receiver(), "editor");
    assert_eq!(command.to_string(), "insert_string -str 'a  b' -line=2");
}

#[test]
fn test_from_string_errors() {
    let context = Context::new();
    let keymap = Keymap::new();
    let parser = CommandParser::new(&context, &keymap, DEFAULTS);

    assert!(matches!(parser.from_string("   "), Err(EditorError::Parse(_))));
    assert!(matches!(
        parser.from_string("teleport 3"),
        Err(EditorError::Lookup(_))
    ));
    assert!(matches!(
        parser.from_string("status 'unterminated"),
        Err(EditorError::Parse(_))
    ));
    assert!(matches!(
        parser.from_string("cursor_move_line up"),
        Err(EditorError::Parse(_))
    ));
}

#[test]
fn test_from_keychord_uses_the_current_context() {
    let mut context = Context::new();
    let mut keymap = Keymap::new();
    keymap.bind("root", "ctrl-q", "quit");
    keymap.bind("prompt", "ctrl-q", "context_pop");

    {
        let parser = CommandParser::new(&context, &keymap, DEFAULTS);
        assert_eq!(parser.from_keychord("ctrl-q").unwrap().kind(), CommandKind::Quit);
    }

    context.stack.push("prompt").unwrap();
    let parser = CommandParser::new(&context, &keymap, DEFAULTS);
    assert_eq!(
        parser.from_keychord("ctrl-q").unwrap().kind(),
        CommandKind::ContextPop
    );

    match parser.from_keychord("f9") {
        Err(EditorError::Lookup(message)) => {
            assert_eq!(message, "f9 is not bound in prompt");
        }
        other => panic!("expected a lookup error, got {:?}", other),
    }
}

#[test]
fn test_bound_command_text_resolves_variables_at_dispatch() {
    let mut context = Context::new();
    let mut keymap = Keymap::new();
    keymap.bind("root", "f2", "status $greeting");

    context.set_var("greeting", "first", Scope::Global);
    let command = CommandParser::new(&context, &keymap, DEFAULTS)
        .from_keychord("f2")
        .unwrap();
    assert_eq!(command.params().named("text"), Some("first"));

    context.set_var("greeting", "second", Scope::Global);
    let command = CommandParser::new(&context, &keymap, DEFAULTS)
        .from_keychord("f2")
        .unwrap();
    assert_eq!(command.params().named("text"), Some("second"));
}

// ========================================================================
// Execution
// ========================================================================

#[test]
fn test_insert_and_delete_commands_edit_at_the_cursor() {
    let mut session = test_session("hello");
    session.execute_str("cursor_set 0 5").unwrap();
    session.execute_str("insert_string -str ' world'").unwrap();
    assert_eq!(text(&session), "hello world");
    assert_eq!(cursor(&session), (0, 11));

    session.execute_str("delete_char_before").unwrap();
    assert_eq!(text(&session), "hello worl");
    assert_eq!(cursor(&session), (0, 10));

    session.execute_str("cursor_set - 0").unwrap();
    session.execute_str("delete_char_after").unwrap();
    assert_eq!(text(&session), "ello worl");
    assert_eq!(cursor(&session), (0, 0));
}

#[test]
fn test_delete_before_at_start_does_nothing() {
    let mut session = test_session("abc");
    let outcome = session.execute_str("delete_char_before").unwrap();
    assert_eq!(outcome, Outcome::Done("0".to_string()));
    assert_eq!(text(&session), "abc");
}

#[test]
fn test_delete_before_joins_lines() {
    let mut session = test_session("ab\ncd");
    session.execute_str("cursor_set 1 0").unwrap();
    session.execute_str("delete_char_before").unwrap();
    assert_eq!(text(&session), "abcd");
    assert_eq!(cursor(&session), (0, 2));
}

#[test]
fn test_line_break_and_tab() {
    let mut session = test_session("ab");
    session.execute_str("cursor_set 0 1").unwrap();
    session.execute_str("insert_line_break").unwrap();
    assert_eq!(text(&session), "a\nb");
    assert_eq!(cursor(&session), (1, 0));

    session.execute_str("insert_tab").unwrap();
    assert_eq!(text(&session), "a\n    b");
    session.execute_str("cursor_set - 5").unwrap();
    session.execute_str("insert_tab").unwrap();
    assert_eq!(text(&session), "a\n    b   ");
    assert_eq!(cursor(&session), (1, 8));
}

#[test]
fn test_cursor_moves_clamp_to_the_buffer() {
    let mut session = test_session("long line\nab\nanother line");
    session.execute_str("cursor_set 0 7").unwrap();
    session.execute_str("cursor_move_line 1").unwrap();
    assert_eq!(cursor(&session), (1, 2));
    session.execute_str("cursor_move_line 1").unwrap();
    assert_eq!(cursor(&session), (2, 7));
    session.execute_str("cursor_move_line 100").unwrap();
    assert_eq!(cursor(&session), (2, 7));
    session.execute_str("cursor_move_offset -100").unwrap();
    assert_eq!(cursor(&session), (0, 0));
}

#[test]
fn test_key_bind_adds_a_working_binding() {
    let mut session = test_session("");
    session
        .execute_str("key_bind root f5 \"insert_string -str hi\"")
        .unwrap();
    assert_eq!(
        session.keymap().lookup("root", "f5"),
        Some("insert_string -str hi")
    );

    session.dispatch_keychord("f5").unwrap();
    assert_eq!(text(&session), "hi");
}

#[test]
fn test_key_bind_rejects_bad_context_names() {
    let mut session = test_session("");
    assert!(matches!(
        session.execute_str("key_bind 'a/b' f5 quit"),
        Err(EditorError::Validation(_))
    ));
}

#[test]
fn test_set_and_unset_respect_scopes() {
    let mut session = test_session("");
    session.execute_str("set mode insert -scope control").unwrap();
    session.execute_str("set mode global-mode").unwrap();
    assert_eq!(
        session.context().get_var("mode", Scope::Control),
        Some("insert")
    );
    assert_eq!(
        session.context().get_var("mode", Scope::Global),
        Some("global-mode")
    );

    let outcome = session.execute_str("unset mode -scope control").unwrap();
    assert_eq!(outcome, Outcome::Done("insert".to_string()));
    assert_eq!(session.context().get_var("mode", Scope::Control), None);

    session.execute_str("status $mode").unwrap();
    assert_eq!(session.status(), "global-mode");
}

#[test]
fn test_context_push_and_pop_switch_bindings() {
    let mut session = test_session("");
    session
        .execute_str("key_bind prompt ctrl-g context_pop")
        .unwrap();
    let outcome = session.execute_str("context_push prompt").unwrap();
    assert_eq!(outcome, Outcome::Done("prompt".to_string()));

    // printable keys are bound in root only
    assert!(matches!(
        session.dispatch_keychord("a"),
        Err(EditorError::Lookup(_))
    ));
    session.dispatch_keychord("ctrl-g").unwrap();
    assert_eq!(session.context().context_name(), "root");

    assert!(matches!(
        session.execute_str("context_pop"),
        Err(EditorError::Validation(_))
    ));
}

#[test]
fn test_split_commands() {
    let mut session = test_session("text");
    let outcome = session.execute_str("split horizontal").unwrap();
    assert_eq!(outcome, Outcome::Done("2".to_string()));
    session.execute_str("split").unwrap();
    assert_eq!(session.views().leaves().len(), 3);

    let first = session.views().active_leaf();
    session.execute_str("focus_next").unwrap();
    assert_ne!(session.views().active_leaf(), first);

    session.execute_str("unsplit").unwrap();
    assert_eq!(session.views().leaves().len(), 2);
    assert!(matches!(
        session.execute_str("split diagonal"),
        Err(EditorError::Parse(_))
    ));
}

#[test]
fn test_split_needs_room_for_two_panes() {
    let mut session = test_session("text");
    session.resize(3, 40);
    assert!(matches!(
        session.execute_str("split horizontal"),
        Err(EditorError::Runtime(_))
    ));
    assert_eq!(
        session.execute_str("split vertical").unwrap(),
        Outcome::Done("2".to_string())
    );
}

#[test]
fn test_result_is_published_as_underscore() {
    let mut session = test_session("abc");
    session.execute_str("cursor_set 0 2").unwrap();
    assert_eq!(session.context().get_var("_", Scope::Global), Some("2"));

    session.execute_str("status $_").unwrap();
    assert_eq!(session.status(), "2");
}

#[test]
fn test_quit_halts() {
    let mut session = test_session("");
    assert_eq!(session.execute_str("quit").unwrap(), Outcome::Halt);
    assert!(session.is_halted());
}

#[test]
fn test_undo_is_a_no_op() {
    let mut session = test_session("abc");
    let command = session.parser().from_string("insert_string x").unwrap();
    session.execute(&command).unwrap();
    command.undo(&mut session).unwrap();
    assert_eq!(text(&session), "xabc");
}
