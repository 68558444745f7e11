#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use crate::machine::Machine;
use pretty_assertions::assert_eq;

fn noop(_: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    Ok(())
}

#[test]
fn test_string_copy_does_not_alias() {
    let original = Value::string("abc");
    let mut copy = original.clone();
    if let Value::Str(s) = &mut copy {
        s.push('d');
    }
    assert_eq!(original, Value::string("abc"));
    assert_eq!(copy, Value::string("abcd"));
}

#[test]
fn test_pseudo_copy_is_deep() {
    let original = Value::pseudo(PseudoEntry::new("(jmp)", noop));
    let mut copy = original.clone();
    if let Value::Pseudo(p) = &mut copy {
        p.push(Value::Integer(7));
    }
    let Value::Pseudo(p) = &original else {
        panic!("expected pseudo-entry");
    };
    assert!(p.body().is_empty());
    assert_ne!(original, copy);
}

#[test]
fn test_opaque_copies_share_the_object() {
    let a = Value::opaque(vec![1_u8, 2, 3], "bytes");
    let b = a.clone();
    assert_eq!(a, b);

    let other = Value::opaque(vec![1_u8, 2, 3], "bytes");
    assert_ne!(a, other);

    let bytes = b.as_opaque().and_then(|o| o.downcast_ref::<Vec<u8>>());
    assert_eq!(bytes, Some(&vec![1, 2, 3]));
}

#[test]
fn test_truthiness() {
    assert_eq!(Value::Integer(0).truthiness(), Some(false));
    assert_eq!(Value::Integer(-1).truthiness(), Some(true));
    assert_eq!(Value::Float(0.0).truthiness(), Some(false));
    assert_eq!(Value::Float(0.5).truthiness(), Some(true));
    assert_eq!(Value::string("").truthiness(), None);
}

#[test]
fn test_display() {
    assert_eq!(Value::Integer(-7).to_string(), "-7");
    assert_eq!(Value::Float(3.0).to_string(), "3.0");
    assert_eq!(Value::string("hi").to_string(), "\"hi\"");
    assert_eq!(Value::opaque((), "sequence").to_string(), "<sequence>");

    let jump = PseudoEntry::new("(jmp)", noop).with_param(Value::Integer(4));
    assert_eq!(Value::pseudo(jump).to_string(), "(jmp) 4");
}

#[test]
fn test_display_resolves_word_refs() {
    let machine = Machine::new();
    let dup = machine.dictionary().find("dup").unwrap();
    let value = Value::WordRef(dup);
    assert_eq!(value.display(machine.dictionary()).to_string(), "'dup");
}
