//! Pseudo-entry routines and the compile-only control words.
//!
//! `if`, `else` and `then` emit branch nodes and patch their targets:
//!
//! ```text
//! : sign  dup 0 < if -1 else 1 then ;
//!         0   1 2 3  4  5    6      7
//! ```
//!
//! `if` emits `(jmp-if-false)` at 3. `else` patches it with 6 and emits
//! `(jmp)` at 5. `then` patches that with 7, the `(exit)` from `;`.

use super::{param0, require_compile};
use crate::errors::{malformed_body, type_mismatch, VmResult};
use crate::machine::Machine;
use crate::value::{Invocation, PseudoEntry, Value};

pub const LITERAL: &str = "(literal)";
pub const JUMP: &str = "(jmp)";
pub const JUMP_IF_FALSE: &str = "(jmp-if-false)";
pub const EXIT: &str = "(exit)";

/// A node that pushes a copy of `value` when threaded.
pub fn literal_node(value: Value) -> Value {
    Value::pseudo(PseudoEntry::new(LITERAL, push_param0).with_param(value))
}

pub fn exit_node() -> Value {
    Value::pseudo(PseudoEntry::new(EXIT, exit))
}

/// Push a copy of the first parameter cell.
///
/// Serves both `(literal)` nodes and `constant` entries.
pub fn push_param0(machine: &mut Machine, inv: Invocation<'_>) -> VmResult<()> {
    let value = param0(machine, inv)?;
    machine.push(value);
    Ok(())
}

fn jump_target(machine: &Machine, inv: Invocation<'_>) -> VmResult<usize> {
    let target = param0(machine, inv)?;
    target
        .as_integer()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| malformed_body(format!("bad jump target {target}")))
}

fn jump(machine: &mut Machine, inv: Invocation<'_>) -> VmResult<()> {
    let target = jump_target(machine, inv)?;
    machine.jump(target)
}

fn jump_if_false(machine: &mut Machine, inv: Invocation<'_>) -> VmResult<()> {
    let target = jump_target(machine, inv)?;
    let cond = machine.pop()?;
    match cond.truthiness() {
        Some(true) => Ok(()),
        Some(false) => machine.jump(target),
        None => Err(type_mismatch("if", "a number", &cond)),
    }
}

fn exit(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    machine.exit_frame()
}

pub(super) fn if_(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    require_compile(machine, "if")?;
    machine.append_branch(PseudoEntry::new(JUMP_IF_FALSE, jump_if_false))
}

pub(super) fn else_(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    require_compile(machine, "else")?;
    let pending = machine.pop_patch("else")?;
    // land just past the (jmp) appended below
    let target = machine.here()? + 1;
    machine.patch(pending, target)?;
    machine.append_branch(PseudoEntry::new(JUMP, jump))
}

pub(super) fn then(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    require_compile(machine, "then")?;
    let pending = machine.pop_patch("then")?;
    let target = machine.here()?;
    machine.patch(pending, target)
}
