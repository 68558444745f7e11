//! Arithmetic and comparison.
//!
//! Integer with Integer stays Integer; a Float on either side promotes both.
//! Comparisons push -1 for true and 0 for false.

use std::cmp::Ordering;

use crate::errors::{division_by_zero, invalid_param, type_mismatch, VmError, VmResult};
use crate::machine::Machine;
use crate::value::{Invocation, Value};

const TRUE: i64 = -1;
const FALSE: i64 = 0;

/// Operands of a binary numeric word after promotion.
enum Operands {
    Int(i64, i64),
    Float(f64, f64),
}

#[expect(clippy::cast_precision_loss, reason = "integers promote to float")]
fn numeric(word: &str, a: &Value, b: &Value) -> VmResult<Operands> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(Operands::Int(*x, *y)),
        (Value::Integer(x), Value::Float(y)) => Ok(Operands::Float(*x as f64, *y)),
        (Value::Float(x), Value::Integer(y)) => Ok(Operands::Float(*x, *y as f64)),
        (Value::Float(x), Value::Float(y)) => Ok(Operands::Float(*x, *y)),
        (Value::Integer(_) | Value::Float(_), other) | (other, _) => {
            Err(type_mismatch(word, "a number", other))
        }
    }
}

fn pop_pair(machine: &mut Machine) -> VmResult<(Value, Value)> {
    let b = machine.pop()?;
    let a = machine.pop()?;
    Ok((a, b))
}

fn overflow(word: &str) -> VmError {
    invalid_param(format!("{word} overflowed"))
}

fn arith(
    machine: &mut Machine,
    word: &str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> VmResult<()> {
    let (a, b) = pop_pair(machine)?;
    let result = match numeric(word, &a, &b)? {
        Operands::Int(x, y) => Value::Integer(int_op(x, y).ok_or_else(|| overflow(word))?),
        Operands::Float(x, y) => Value::Float(float_op(x, y)),
    };
    machine.push(result);
    Ok(())
}

/// ( a b -- a+b ). Two strings concatenate.
pub(super) fn add(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    if matches!(machine.stack(), [.., Value::Str(_), Value::Str(_)]) {
        let (a, b) = pop_pair(machine)?;
        if let (Value::Str(mut a), Value::Str(b)) = (a, b) {
            a.push_str(&b);
            machine.push(Value::Str(a));
        }
        return Ok(());
    }
    arith(machine, "+", i64::checked_add, |x, y| x + y)
}

pub(super) fn sub(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    arith(machine, "-", i64::checked_sub, |x, y| x - y)
}

pub(super) fn mul(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    arith(machine, "*", i64::checked_mul, |x, y| x * y)
}

fn divide(
    machine: &mut Machine,
    word: &str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> VmResult<()> {
    let (a, b) = pop_pair(machine)?;
    let result = match numeric(word, &a, &b)? {
        Operands::Int(_, 0) => return Err(division_by_zero(word)),
        Operands::Float(_, y) if y == 0.0 => return Err(division_by_zero(word)),
        Operands::Int(x, y) => Value::Integer(int_op(x, y).ok_or_else(|| overflow(word))?),
        Operands::Float(x, y) => Value::Float(float_op(x, y)),
    };
    machine.push(result);
    Ok(())
}

pub(super) fn div(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    divide(machine, "/", i64::checked_div, |x, y| x / y)
}

pub(super) fn rem(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    divide(machine, "mod", i64::checked_rem, |x, y| x % y)
}

/// ( n -- -n )
pub(super) fn negate(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let result = match machine.pop()? {
        Value::Integer(n) => Value::Integer(n.checked_neg().ok_or_else(|| overflow("negate"))?),
        Value::Float(x) => Value::Float(-x),
        other => return Err(type_mismatch("negate", "a number", &other)),
    };
    machine.push(result);
    Ok(())
}

fn ordering(word: &str, a: &Value, b: &Value) -> VmResult<Option<Ordering>> {
    if let (Value::Str(x), Value::Str(y)) = (a, b) {
        return Ok(Some(x.cmp(y)));
    }
    Ok(match numeric(word, a, b)? {
        Operands::Int(x, y) => Some(x.cmp(&y)),
        Operands::Float(x, y) => x.partial_cmp(&y),
    })
}

fn flag(machine: &mut Machine, truth: bool) {
    machine.push(Value::Integer(if truth { TRUE } else { FALSE }));
}

fn equality(machine: &mut Machine, word: &str) -> VmResult<bool> {
    let (a, b) = pop_pair(machine)?;
    let numbers = matches!(a, Value::Integer(_) | Value::Float(_))
        && matches!(b, Value::Integer(_) | Value::Float(_));
    if numbers {
        Ok(ordering(word, &a, &b)? == Some(Ordering::Equal))
    } else {
        Ok(a == b)
    }
}

pub(super) fn eq(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let truth = equality(machine, "=")?;
    flag(machine, truth);
    Ok(())
}

pub(super) fn ne(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let truth = !equality(machine, "<>")?;
    flag(machine, truth);
    Ok(())
}

fn compare(machine: &mut Machine, word: &str, test: fn(Ordering) -> bool) -> VmResult<()> {
    let (a, b) = pop_pair(machine)?;
    let truth = ordering(word, &a, &b)?.is_some_and(test);
    flag(machine, truth);
    Ok(())
}

pub(super) fn lt(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    compare(machine, "<", Ordering::is_lt)
}

pub(super) fn gt(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    compare(machine, ">", Ordering::is_gt)
}

pub(super) fn le(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    compare(machine, "<=", Ordering::is_le)
}

pub(super) fn ge(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    compare(machine, ">=", Ordering::is_ge)
}
