//! Introspection and loop control.

use std::fmt::Write as _;

use super::control::{EXIT, LITERAL};
use crate::dictionary::{Dictionary, EntryId};
use crate::errors::{unknown_word, VmResult};
use crate::machine::Machine;
use crate::value::{Invocation, Value};

/// Render an entry in source-like form, e.g. `: double dup + ;`.
///
/// Native entries show as `(native)` followed by their parameter cells.
/// Branch nodes keep their raw form with the patched target. An entry that
/// was never completed has no closing `;`.
pub fn render_definition(dictionary: &Dictionary, id: EntryId) -> String {
    let entry = dictionary.get(id);
    let mut out = format!(": {}", entry.name());
    if entry.is_native() {
        out.push_str(" (native)");
        for cell in entry.body() {
            let _ = write!(out, " {}", cell.display(dictionary));
        }
        out.push_str(" ;");
        return out;
    }
    for cell in entry.body() {
        match cell {
            Value::WordRef(target) => {
                let _ = write!(out, " {}", dictionary.get(*target).name());
            }
            Value::Pseudo(node) if node.name() == EXIT => out.push_str(" ;"),
            Value::Pseudo(node) if node.name() == LITERAL => {
                if let Some(literal) = node.param0() {
                    let _ = write!(out, " {}", literal.display(dictionary));
                }
            }
            other => {
                let _ = write!(out, " {}", other.display(dictionary));
            }
        }
    }
    out
}

/// `.d` name
pub(super) fn print_definition(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let name = machine.next_name(".d")?;
    let id = machine
        .dictionary()
        .find(&name)
        .ok_or_else(|| unknown_word(&name))?;
    let text = render_definition(machine.dictionary(), id);
    machine.stdout().println(&text);
    Ok(())
}

/// `words` lists every name lookup can see, newest first.
pub(super) fn words(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let line = machine.dictionary().visible_names().join(" ");
    machine.stdout().println(&line);
    Ok(())
}

pub(super) fn quit(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    machine.halt();
    Ok(())
}
