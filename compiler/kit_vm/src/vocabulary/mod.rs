//! The core vocabulary bootstrapped into every machine, plus the pop
//! helpers native routines share.

mod arith;
pub mod control;
mod defining;
mod stack_ops;
mod system;

use crate::dictionary::EntryId;
use crate::errors::{compile_only, malformed_body, type_mismatch, VmResult};
use crate::machine::{Machine, Mode};
use crate::value::{Invocation, Opaque, Value};

pub use system::render_definition;

/// Register the core words.
pub fn install(machine: &mut Machine) {
    // defining and memory
    machine.define_native(":", defining::colon);
    machine.define_immediate(";", defining::semicolon);
    machine.define_native("constant", defining::constant);
    machine.define_native("variable", defining::variable);
    machine.define_native("!", defining::store);
    machine.define_native("@", defining::fetch);
    machine.define_native("'", defining::tick);
    machine.define_native("execute", defining::execute);

    // control
    machine.define_immediate("if", control::if_);
    machine.define_immediate("else", control::else_);
    machine.define_immediate("then", control::then);

    // stack
    machine.define_native("dup", stack_ops::dup);
    machine.define_native("drop", stack_ops::drop);
    machine.define_native("swap", stack_ops::swap);
    machine.define_native("over", stack_ops::over);
    machine.define_native("rot", stack_ops::rot);
    machine.define_native(".s", stack_ops::print_stack);
    machine.define_native(".", stack_ops::print_top);

    // arithmetic and comparison
    machine.define_native("+", arith::add);
    machine.define_native("-", arith::sub);
    machine.define_native("*", arith::mul);
    machine.define_native("/", arith::div);
    machine.define_native("mod", arith::rem);
    machine.define_native("negate", arith::negate);
    machine.define_native("=", arith::eq);
    machine.define_native("<>", arith::ne);
    machine.define_native("<", arith::lt);
    machine.define_native(">", arith::gt);
    machine.define_native("<=", arith::le);
    machine.define_native(">=", arith::ge);

    // introspection and system
    machine.define_native(".d", system::print_definition);
    machine.define_native("words", system::words);
    machine.define_native("quit", system::quit);
}

/// First parameter cell of whatever the routine was invoked as.
pub fn param0(machine: &Machine, inv: Invocation<'_>) -> VmResult<Value> {
    let cell = match inv {
        Invocation::Pseudo(node) => node.param0(),
        Invocation::Entry(id) => machine.dictionary().get(id).body().first(),
    };
    cell.cloned()
        .ok_or_else(|| malformed_body("routine expected a parameter cell"))
}

pub(crate) fn require_compile(machine: &Machine, word: &str) -> VmResult<()> {
    if machine.mode() == Mode::Compile {
        Ok(())
    } else {
        Err(compile_only(word))
    }
}

pub fn pop_word_ref(machine: &mut Machine, word: &str) -> VmResult<EntryId> {
    let value = machine.pop()?;
    value
        .as_word_ref()
        .ok_or_else(|| type_mismatch(word, "a word reference", &value))
}

pub fn pop_integer(machine: &mut Machine, word: &str) -> VmResult<i64> {
    let value = machine.pop()?;
    value
        .as_integer()
        .ok_or_else(|| type_mismatch(word, "an integer", &value))
}

pub fn pop_opaque(machine: &mut Machine, word: &str) -> VmResult<Opaque> {
    match machine.pop()? {
        Value::Opaque(o) => Ok(o),
        other => Err(type_mismatch(word, "an opaque value", &other)),
    }
}
