//! `lex-stats`: summaries over sequences of numbers.
//!
//! ```text
//! sum   ( seq -- seq n )
//! mean  ( seq -- seq f )
//! ```
//!
//! Loads `lex-sequence` first.

use kit_vm::{division_by_zero, invalid_param, type_mismatch, Invocation, Machine, Value, VmResult};
use tracing::debug;

use crate::sequence::{sequence, top_sequence};
use crate::{LEX_SEQUENCE, LEX_STATS};

pub(crate) fn load(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    machine.find_and_execute(LEX_SEQUENCE)?;
    if !machine.mark_lexicon_loaded(LEX_STATS) {
        return Ok(());
    }
    machine.define_native("sum", sum);
    machine.define_native("mean", mean);
    debug!(lexicon = LEX_STATS, "loaded");
    Ok(())
}

/// Total of a list of numbers. Stays an integer unless a float is present.
fn total(word: &str, items: &[Value]) -> VmResult<Value> {
    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    let mut any_float = false;
    for item in items {
        match item {
            Value::Integer(n) => {
                int_total = int_total
                    .checked_add(*n)
                    .ok_or_else(|| invalid_param(format!("{word} overflowed")))?;
            }
            Value::Float(x) => {
                any_float = true;
                float_total += x;
            }
            other => return Err(type_mismatch(word, "a number", other)),
        }
    }
    #[expect(clippy::cast_precision_loss, reason = "mixed totals are floats")]
    let mixed = float_total + int_total as f64;
    Ok(if any_float {
        Value::Float(mixed)
    } else {
        Value::Integer(int_total)
    })
}

fn sum(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let handle = top_sequence(machine, "sum")?;
    let items = sequence(&handle)?.to_vec();
    let result = total("sum", &items)?;
    machine.push(result);
    Ok(())
}

#[allow(clippy::cast_precision_loss, reason = "means are floats")]
fn mean(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let handle = top_sequence(machine, "mean")?;
    let items = sequence(&handle)?.to_vec();
    if items.is_empty() {
        return Err(division_by_zero("mean of an empty sequence"));
    }
    let result = match total("mean", &items)? {
        Value::Integer(n) => n as f64 / items.len() as f64,
        Value::Float(x) => x / items.len() as f64,
        other => return Err(type_mismatch("mean", "a number", &other)),
    };
    machine.push(Value::Float(result));
    Ok(())
}

#[cfg(test)]
mod tests;
