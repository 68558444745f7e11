#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use kit_vm::{buffer_handler, Value};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn machine() -> (Machine, SharedOutput, SharedOutput) {
    let out = buffer_handler();
    let err = buffer_handler();
    (new_machine(out.clone(), err.clone()), out, err)
}

#[test]
fn test_lexicon_loaders_are_installed() {
    let (m, _, _) = machine();
    assert!(m.dictionary().find("lex-sequence").is_some());
    assert!(m.dictionary().find("lex-stats").is_some());
}

#[test]
fn test_run_source_reports_lex_errors() {
    let (mut m, _, err) = machine();
    assert_eq!(run_source(&mut m, "1 \"open"), 1);
    assert!(err
        .contents()
        .starts_with("LexError: unrecognised input at byte 2"));
    assert!(m.stack().is_empty());
}

#[test]
fn test_lines_share_one_machine() {
    let (mut m, out, _) = machine();
    let input = Cursor::new(": square\ndup * ;\n7 square .\n");
    let errors = run_lines(&mut m, input, false).unwrap();
    assert_eq!(errors, 0);
    assert_eq!(out.contents(), "49\n");
}

#[test]
fn test_defining_word_takes_its_name_from_the_next_line() {
    let (mut m, _, err) = machine();
    let input = Cursor::new("variable\nx\n7 x ! x @");
    let errors = run_lines(&mut m, input, false).unwrap();
    assert_eq!(errors, 0);
    assert_eq!(err.contents(), "");
    assert_eq!(m.stack(), &[Value::Integer(7)]);
}

#[test]
fn test_name_missing_at_end_of_input() {
    let (mut m, _, err) = machine();
    let input = Cursor::new("1\n:\n");
    let errors = run_lines(&mut m, input, false).unwrap();
    assert_eq!(errors, 1);
    assert_eq!(err.contents(), "MissingName: : needs a name to follow it\n");
}

#[test]
fn test_lex_error_skips_only_its_line() {
    let (mut m, _, err) = machine();
    let input = Cursor::new(": twice\n\"open\ndup + ;\n5 twice");
    let errors = run_lines(&mut m, input, false).unwrap();
    assert_eq!(errors, 1);
    assert!(err.contents().starts_with("LexError: "));
    assert_eq!(m.stack(), &[Value::Integer(10)]);
}

#[test]
fn test_quit_stops_reading() {
    let (mut m, out, _) = machine();
    let input = Cursor::new("1 .\nquit\n2 .\n");
    run_lines(&mut m, input, false).unwrap();
    assert_eq!(out.contents(), "1\n");
}

#[test]
fn test_prompt_is_written_per_line() {
    let (mut m, out, _) = machine();
    let input = Cursor::new("1\n2\n");
    run_lines(&mut m, input, true).unwrap();
    // one prompt per line plus the one that sees end of input
    assert_eq!(out.contents(), "> > > ");
    assert_eq!(m.stack(), &[Value::Integer(1), Value::Integer(2)]);
}

#[test]
fn test_errors_do_not_end_the_session() {
    let (mut m, _, err) = machine();
    let input = Cursor::new("nope\n3\n");
    let errors = run_lines(&mut m, input, false).unwrap();
    assert_eq!(errors, 1);
    assert_eq!(err.contents(), "UnknownWord: nope\n");
    assert_eq!(m.stack(), &[Value::Integer(3)]);
}

#[test]
fn test_missing_file() {
    let (mut m, _, _) = machine();
    let err = run_file(&mut m, Path::new("/definitely/not/here.kit")).unwrap_err();
    assert_eq!(err.to_string(), "Unable to open file: /definitely/not/here.kit");
}
