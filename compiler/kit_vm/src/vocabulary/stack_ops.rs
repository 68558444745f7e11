//! Stack shuffling and printing.

use std::fmt::Write as _;

use crate::errors::VmResult;
use crate::machine::Machine;
use crate::value::{Invocation, Value};

/// ( x -- x x )
pub(super) fn dup(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let top = machine.peek()?.clone();
    machine.push(top);
    Ok(())
}

/// ( x -- )
pub(super) fn drop(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    machine.pop()?;
    Ok(())
}

/// ( a b -- b a )
pub(super) fn swap(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;
    machine.push(b);
    machine.push(a);
    Ok(())
}

/// ( a b -- a b a )
pub(super) fn over(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let b = machine.pop()?;
    let a = machine.peek()?.clone();
    machine.push(b);
    machine.push(a);
    Ok(())
}

/// ( a b c -- b c a )
pub(super) fn rot(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let c = machine.pop()?;
    let b = machine.pop()?;
    let a = machine.pop()?;
    machine.push(b);
    machine.push(c);
    machine.push(a);
    Ok(())
}

/// `.s` prints `<depth> bottom ... top` without consuming anything.
pub(super) fn print_stack(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let mut line = format!("<{}>", machine.data().depth());
    for value in machine.stack() {
        let _ = write!(line, " {}", value.display(machine.dictionary()));
    }
    machine.stdout().println(&line);
    Ok(())
}

/// `.` ( x -- ) prints x. Strings print without quotes.
pub(super) fn print_top(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let value = machine.pop()?;
    let text = match &value {
        Value::Str(s) => s.clone(),
        other => other.display(machine.dictionary()).to_string(),
    };
    machine.stdout().println(&text);
    Ok(())
}
