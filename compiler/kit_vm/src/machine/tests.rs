#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use kit_lexer::lex;
use crate::errors::VmErrorKind;
use crate::output::{buffer_handler, SharedOutput};
use crate::value::{Invocation, PseudoEntry};
use crate::vocabulary::control::{literal_node, LITERAL};
use pretty_assertions::assert_eq;

fn machine() -> (Machine, SharedOutput, SharedOutput) {
    let out = buffer_handler();
    let err = buffer_handler();
    let machine = Machine::builder()
        .stdout(out.clone())
        .stderr(err.clone())
        .build();
    (machine, out, err)
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Integer).collect()
}

#[test]
fn test_literals_push_in_execute_mode() {
    let (mut m, _, _) = machine();
    m.interpret(Token::integer("3")).unwrap();
    m.interpret(Token::float("2.5")).unwrap();
    m.interpret(Token::string("hi")).unwrap();
    assert_eq!(
        m.stack(),
        &[Value::Integer(3), Value::Float(2.5), Value::string("hi")]
    );
}

#[test]
fn test_unknown_word_in_execute_mode() {
    let (mut m, _, _) = machine();
    let err = m.interpret(Token::word("frobnicate")).unwrap_err();
    assert_eq!(err.kind(), VmErrorKind::UnknownWord);
    assert_eq!(err.context, "frobnicate");
}

#[test]
fn test_end_of_input_is_not_interpretable() {
    let (mut m, _, _) = machine();
    let err = m.interpret(Token::end_of_input()).unwrap_err();
    assert_eq!(err.kind(), VmErrorKind::UnknownTokenType);
}

#[test]
fn test_integer_literal_out_of_range() {
    let (mut m, _, _) = machine();
    let err = m
        .interpret(Token::integer("99999999999999999999"))
        .unwrap_err();
    assert_eq!(err.kind(), VmErrorKind::InvalidParam);
}

#[test]
fn test_compile_appends_word_refs_and_literals() {
    let (mut m, _, _) = machine();
    m.begin_definition("five-dup");
    m.compile(Token::integer("5")).unwrap();
    m.compile(Token::word("dup")).unwrap();

    let id = m.dictionary().latest().unwrap();
    let dup = m.dictionary().find("dup").unwrap();
    let body = m.dictionary().get(id).body();
    assert_eq!(body.len(), 2);
    let Value::Pseudo(node) = &body[0] else {
        panic!("expected literal node, got {:?}", body[0]);
    };
    assert_eq!(node.name(), LITERAL);
    assert_eq!(node.param0(), Some(&Value::Integer(5)));
    assert_eq!(body[1], Value::WordRef(dup));
    assert_eq!(m.mode(), Mode::Compile);
}

#[test]
fn test_compile_rejects_unknown_words_and_end_of_input() {
    let (mut m, _, _) = machine();
    m.begin_definition("broken");
    assert_eq!(
        m.compile(Token::word("nope")).unwrap_err().kind(),
        VmErrorKind::UnknownWord
    );
    assert_eq!(
        m.compile(Token::end_of_input()).unwrap_err().kind(),
        VmErrorKind::UnknownTokenType
    );
}

#[test]
fn test_execute_threads_compiled_body() {
    let (mut m, _, _) = machine();
    m.interpret_source(": double dup + ;").unwrap();
    let double = m.dictionary().find("double").unwrap();
    m.push(21);
    m.execute(double).unwrap();
    assert_eq!(m.stack(), ints(&[42]).as_slice());
    assert!(m.returns().is_empty());
    assert!(m.cursor().is_none());
}

#[test]
fn test_body_without_exit_returns_implicitly() {
    let (mut m, _, _) = machine();
    let id = m.dictionary_mut().add("two-ones");
    m.dictionary_mut().get_mut(id).push(literal_node(Value::Integer(1)));
    m.dictionary_mut().get_mut(id).push(literal_node(Value::Integer(1)));
    m.dictionary_mut().get_mut(id).mark_complete();

    m.execute(id).unwrap();
    m.execute(id).unwrap();
    assert_eq!(m.stack(), ints(&[1, 1, 1, 1]).as_slice());
    assert!(m.returns().is_empty());
}

#[test]
fn test_malformed_body_element() {
    let (mut m, _, _) = machine();
    let id = m.dictionary_mut().add("bad");
    m.dictionary_mut().get_mut(id).push(Value::Integer(7));
    m.dictionary_mut().get_mut(id).mark_complete();

    let err = m.execute(id).unwrap_err();
    assert_eq!(err.kind(), VmErrorKind::MalformedBody);
}

#[test]
fn test_incomplete_entry_cannot_run() {
    let (mut m, _, _) = machine();
    let id = m.begin_definition("half");
    let err = m.execute(id).unwrap_err();
    assert_eq!(err.kind(), VmErrorKind::MalformedBody);
}

#[test]
fn test_pseudo_routine_sees_its_own_params() {
    fn push_sum(machine: &mut Machine, inv: Invocation<'_>) -> VmResult<()> {
        let Invocation::Pseudo(node) = inv else {
            return Err(crate::errors::malformed_body("expected pseudo"));
        };
        let sum = node.body().iter().filter_map(Value::as_integer).sum::<i64>();
        machine.push(sum);
        Ok(())
    }

    let (mut m, _, _) = machine();
    let id = m.dictionary_mut().add("sum-node");
    let node = PseudoEntry::new("(sum)", push_sum)
        .with_param(Value::Integer(2))
        .with_param(Value::Integer(3));
    m.dictionary_mut().get_mut(id).push(Value::pseudo(node));
    m.dictionary_mut().get_mut(id).mark_complete();

    m.execute(id).unwrap();
    assert_eq!(m.stack(), ints(&[5]).as_slice());
}

#[test]
fn test_runaway_recursion_is_reported() {
    let out = buffer_handler();
    let err = buffer_handler();
    let mut m = Machine::builder()
        .max_call_depth(Some(64))
        .stdout(out)
        .stderr(err.clone())
        .build();
    let errors = m.interpret_source(": forever forever ; forever").unwrap();
    assert_eq!(errors, 1);
    assert!(err.contents().starts_with("StackOverflow: "));
    assert!(m.returns().is_empty());
}

#[test]
fn test_recursion_terminates_with_condition() {
    let (mut m, _, _) = machine();
    m.interpret_source(": countdown dup 0 > if 1 - countdown then ; 10 countdown")
        .unwrap();
    assert_eq!(m.stack(), ints(&[0]).as_slice());
}

#[test]
fn test_run_reports_and_resets() {
    let (mut m, _, err) = machine();
    let errors = m.interpret_source("1 2 drop drop drop 5").unwrap();
    assert_eq!(errors, 1);
    assert_eq!(err.contents(), "StackUnderflow: data stack is empty\n");
    // the loop carries on after the reset
    assert_eq!(m.stack(), ints(&[5]).as_slice());
    assert_eq!(m.mode(), Mode::Execute);
}

#[test]
fn test_reset_leaves_compile_mode() {
    let (mut m, _, err) = machine();
    m.interpret_source(": oops nothing-here").unwrap();
    assert_eq!(err.contents(), "UnknownWord: nothing-here\n");
    assert_eq!(m.mode(), Mode::Execute);
    assert!(m.pending_patches().is_empty());
}

#[test]
fn test_failed_redefinition_keeps_the_old_word() {
    let (mut m, _, err) = machine();
    m.interpret_source(": double dup + ; : double typo ; 21 double")
        .unwrap();
    assert_eq!(
        err.contents(),
        "UnknownWord: typo\nCompileOnly: ; is only valid inside a definition\n"
    );
    assert_eq!(m.stack(), ints(&[42]).as_slice());
}

#[test]
fn test_failed_definition_does_not_shadow_core_words() {
    let (mut m, _, err) = machine();
    m.interpret_source(": dup nope ; 4 dup").unwrap();
    assert_eq!(m.stack(), ints(&[4, 4]).as_slice());
    assert!(!err.contents().contains("MalformedBody"));
    let abandoned = m.dictionary().latest().unwrap();
    assert!(m.dictionary().get(abandoned).is_hidden());
    let dups = m.dictionary().visible_names().into_iter().filter(|n| *n == "dup");
    assert_eq!(dups.count(), 1);
}

#[test]
fn test_definition_in_progress_can_call_itself() {
    let (mut m, _, _) = machine();
    m.interpret_source(": down dup if 1 - down then ; 3 down").unwrap();
    assert_eq!(m.stack(), ints(&[0]).as_slice());
}

#[test]
fn test_run_stops_at_end_of_input() {
    let (mut m, _, _) = machine();
    m.feed(vec![
        Token::integer("1"),
        Token::end_of_input(),
        Token::integer("2"),
    ]);
    m.run();
    assert_eq!(m.stack(), ints(&[1]).as_slice());
    assert_eq!(m.pending_input(), 1);
}

#[test]
fn test_definitions_span_feeds() {
    let (mut m, _, _) = machine();
    m.interpret_source(": triple").unwrap();
    assert_eq!(m.mode(), Mode::Compile);
    m.interpret_source("dup dup + + ;").unwrap();
    m.interpret_source("4 triple").unwrap();
    assert_eq!(m.stack(), ints(&[12]).as_slice());
}

#[test]
fn test_names_are_pulled_from_the_refill_source() {
    let (mut m, _, err) = machine();
    let mut lines = vec!["7 x ! x @", "x", "variable"];
    m.set_refill(Box::new(move || {
        let line = lines.pop()?;
        let mut tokens = lex(line).ok()?;
        tokens.retain(|token| !token.is_end());
        Some(tokens)
    }));
    assert_eq!(m.run(), 0);
    assert_eq!(err.contents(), "");
    assert_eq!(m.stack(), ints(&[7]).as_slice());
}

#[test]
fn test_missing_name_once_refill_is_exhausted() {
    let (mut m, _, err) = machine();
    let mut batches = vec![Vec::new(), vec![Token::word("constant")]];
    m.push(1);
    m.set_refill(Box::new(move || batches.pop()));
    assert_eq!(m.run(), 1);
    assert_eq!(
        err.contents(),
        "MissingName: constant needs a name to follow it\n"
    );
    assert_eq!(m.next_token(), None);
}

#[test]
fn test_quit_halts_the_loop() {
    let (mut m, _, _) = machine();
    m.interpret_source("1 quit 2").unwrap();
    assert!(m.is_halted());
    assert_eq!(m.stack(), ints(&[1]).as_slice());
}

#[test]
fn test_lex_error_leaves_machine_untouched() {
    let (mut m, _, _) = machine();
    m.push(1);
    assert!(m.interpret_source("1 \"unterminated").is_err());
    assert_eq!(m.stack(), ints(&[1]).as_slice());
    assert_eq!(m.pending_input(), 0);
}

#[test]
fn test_next_name_errors() {
    let (mut m, _, _) = machine();
    assert_eq!(
        m.next_name(":").unwrap_err().kind(),
        VmErrorKind::MissingName
    );

    m.feed(vec![Token::end_of_input()]);
    assert_eq!(
        m.next_name(":").unwrap_err().kind(),
        VmErrorKind::MissingName
    );
    // end of input stays queued for the loop
    assert_eq!(m.pending_input(), 1);

    let mut m2 = Machine::new();
    m2.feed(vec![Token::integer("5")]);
    assert_eq!(
        m2.next_name("variable").unwrap_err().kind(),
        VmErrorKind::InvalidParam
    );
}

#[test]
fn test_find_and_execute() {
    let (mut m, _, _) = machine();
    m.push(2);
    m.find_and_execute("dup").unwrap();
    assert_eq!(m.stack(), ints(&[2, 2]).as_slice());
    assert_eq!(
        m.find_and_execute("missing").unwrap_err().kind(),
        VmErrorKind::UnknownWord
    );
}

#[test]
fn test_bare_machine_has_empty_dictionary() {
    let m = Machine::builder().core_vocabulary(false).build();
    assert!(m.dictionary().is_empty());
}

#[test]
fn test_mark_lexicon_loaded() {
    let mut m = Machine::builder().core_vocabulary(false).build();
    assert!(m.mark_lexicon_loaded("lex-x"));
    assert!(!m.mark_lexicon_loaded("lex-x"));
}

#[test]
fn test_independent_machines() {
    let (mut a, _, _) = machine();
    let (mut b, _, _) = machine();
    a.interpret_source(": only-in-a 1 ;").unwrap();
    assert!(a.dictionary().find("only-in-a").is_some());
    assert!(b.dictionary().find("only-in-a").is_none());
    b.push(9);
    assert!(a.stack().is_empty());
}
