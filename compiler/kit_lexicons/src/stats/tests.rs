#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use kit_vm::{buffer_handler, SharedOutput};
use pretty_assertions::assert_eq;

fn loaded() -> (Machine, SharedOutput) {
    let err = buffer_handler();
    let mut machine = Machine::builder()
        .stdout(buffer_handler())
        .stderr(err.clone())
        .build();
    crate::install(&mut machine);
    machine.interpret_source("lex-stats").unwrap();
    (machine, err)
}

#[test]
fn test_loading_stats_loads_sequences() {
    let (m, _) = loaded();
    assert!(m.dictionary().find("seq").is_some());
    assert!(m.dictionary().find("sum").is_some());
    // dependency words come first, so ours are newer
    let seq = m.dictionary().find("seq").unwrap();
    let sum = m.dictionary().find("sum").unwrap();
    assert!(sum > seq);
}

#[test]
fn test_sum_of_integers() {
    let (mut m, err) = loaded();
    m.interpret_source("seq 1 seq-push 2 seq-push 3 seq-push sum").unwrap();
    assert_eq!(err.contents(), "");
    assert_eq!(m.pop().unwrap(), Value::Integer(6));
}

#[test]
fn test_sum_promotes_to_float() {
    let (mut m, _) = loaded();
    m.interpret_source("seq 1 seq-push 0.5 seq-push sum").unwrap();
    assert_eq!(m.pop().unwrap(), Value::Float(1.5));
}

#[test]
fn test_sum_of_empty_sequence() {
    let (mut m, _) = loaded();
    m.interpret_source("seq sum").unwrap();
    assert_eq!(m.pop().unwrap(), Value::Integer(0));
}

#[test]
fn test_mean() {
    let (mut m, err) = loaded();
    m.interpret_source("seq 1 seq-push 2 seq-push mean").unwrap();
    assert_eq!(err.contents(), "");
    assert_eq!(m.pop().unwrap(), Value::Float(1.5));
}

#[test]
fn test_mean_of_empty_sequence() {
    let (mut m, err) = loaded();
    m.interpret_source("seq mean").unwrap();
    assert_eq!(
        err.contents(),
        "DivisionByZero: mean of an empty sequence\n"
    );
}

#[test]
fn test_non_numeric_items() {
    let (mut m, err) = loaded();
    m.interpret_source("seq \"x\" seq-push sum").unwrap();
    assert_eq!(
        err.contents(),
        "InvalidParam: sum expected a number, got string\n"
    );
}

#[test]
fn test_total_helper() {
    assert_eq!(
        total("sum", &[Value::Integer(2), Value::Integer(-5)]).unwrap(),
        Value::Integer(-3)
    );
    assert!(total("sum", &[Value::Integer(i64::MAX), Value::Integer(1)]).is_err());
}
