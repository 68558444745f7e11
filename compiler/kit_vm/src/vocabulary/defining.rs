//! Defining words and cell access.

use super::control::{exit_node, push_param0};
use super::{pop_word_ref, require_compile};
use crate::errors::{invalid_param, malformed_body, type_mismatch, unknown_word, VmResult};
use crate::machine::Machine;
use crate::value::{Invocation, Value};

/// `:` name
pub(super) fn colon(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let name = machine.next_name(":")?;
    machine.begin_definition(&name);
    Ok(())
}

/// `;` (immediate)
pub(super) fn semicolon(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    require_compile(machine, ";")?;
    machine.append(exit_node())?;
    machine.end_definition()
}

/// `constant` ( x -- ) name
pub(super) fn constant(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let name = machine.next_name("constant")?;
    let value = machine.pop()?;
    machine.define_with_param(&name, push_param0, value);
    Ok(())
}

/// `variable` name
pub(super) fn variable(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let name = machine.next_name("variable")?;
    machine.define_with_param(&name, push_self, Value::Integer(0));
    Ok(())
}

fn push_self(machine: &mut Machine, inv: Invocation<'_>) -> VmResult<()> {
    let id = inv
        .entry()
        .ok_or_else(|| malformed_body("variable routine run without its entry"))?;
    machine.push(Value::WordRef(id));
    Ok(())
}

/// `!` ( x ref -- )
pub(super) fn store(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let id = pop_word_ref(machine, "!")?;
    let value = machine.pop()?;
    let entry = machine.dictionary_mut().get_mut(id);
    if !entry.is_native() || entry.body().is_empty() {
        return Err(invalid_param(format!("{} has no cell to store into", entry.name())));
    }
    if let Some(cell) = entry.body_mut().first_mut() {
        *cell = value;
    }
    Ok(())
}

/// `@` ( ref -- x )
pub(super) fn fetch(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let id = pop_word_ref(machine, "@")?;
    let entry = machine.dictionary().get(id);
    let cell = entry
        .body()
        .first()
        .filter(|_| entry.is_native())
        .cloned()
        .ok_or_else(|| invalid_param(format!("{} has no cell to fetch from", entry.name())))?;
    machine.push(cell);
    Ok(())
}

/// `'` name ( -- ref )
pub(super) fn tick(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let name = machine.next_name("'")?;
    let id = machine
        .dictionary()
        .find(&name)
        .ok_or_else(|| unknown_word(&name))?;
    machine.push(Value::WordRef(id));
    Ok(())
}

/// `execute` ( ref -- )
pub(super) fn execute(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let value = machine.pop()?;
    match value {
        Value::WordRef(id) => machine.execute(id),
        other => Err(type_mismatch("execute", "a word reference", &other)),
    }
}
