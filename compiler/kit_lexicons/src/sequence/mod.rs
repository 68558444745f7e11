//! `lex-sequence`: ordered collections passed around as opaque values.
//!
//! ```text
//! seq        ( -- seq )
//! seq-push   ( seq x -- seq )
//! len        ( seq -- seq n )
//! seq-get    ( seq i -- seq x )
//! ascending  ( seq key -- seq )
//! descending ( seq key -- seq )
//! pop-seq    ( seq -- )
//! .seq       ( seq -- seq )
//! ```
//!
//! `ascending` and `descending` sort by the value a key word leaves on the
//! stack. The key word sees one item at a time and has the effect
//! `( x -- x key )`; it is named by a word reference or a string.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::mem;

use kit_vm::vocabulary::{pop_integer, pop_opaque};
use kit_vm::{
    invalid_param, type_mismatch, unknown_word, EntryId, Invocation, Machine, Opaque, Value,
    VmResult,
};
use tracing::debug;

use crate::LEX_SEQUENCE;

/// Opaque tag carried by every sequence value.
pub const SEQUENCE_TAG: &str = "sequence";

/// A growable list of values shared by every copy of its opaque handle.
#[derive(Debug, Default)]
pub struct Sequence {
    items: RefCell<Vec<Value>>,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Sequence {
            items: RefCell::new(values),
        }
    }

    /// Wrap a new sequence as a stack value.
    pub fn into_value(self) -> Value {
        Value::opaque(self, SEQUENCE_TAG)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    /// Copy of the current items.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub fn replace(&self, values: Vec<Value>) {
        *self.items.borrow_mut() = values;
    }
}

pub(crate) fn load(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    if !machine.mark_lexicon_loaded(LEX_SEQUENCE) {
        return Ok(());
    }
    machine.define_native("seq", seq);
    machine.define_native("seq-push", seq_push);
    machine.define_native("len", len);
    machine.define_native("seq-get", seq_get);
    machine.define_native("ascending", ascending);
    machine.define_native("descending", descending);
    machine.define_native("pop-seq", pop_seq);
    machine.define_native(".seq", print_seq);
    debug!(lexicon = LEX_SEQUENCE, "loaded");
    Ok(())
}

/// Handle to the sequence on top of the stack, left in place.
pub(crate) fn top_sequence(machine: &Machine, word: &str) -> VmResult<Opaque> {
    match machine.peek()? {
        Value::Opaque(o) if o.tag() == SEQUENCE_TAG && o.downcast_ref::<Sequence>().is_some() => {
            Ok(o.clone())
        }
        other => Err(type_mismatch(word, "a sequence", other)),
    }
}

/// Borrow the sequence behind a handle from [`top_sequence`].
pub(crate) fn sequence(handle: &Opaque) -> VmResult<&Sequence> {
    handle
        .downcast_ref::<Sequence>()
        .ok_or_else(|| invalid_param(format!("{} is not a sequence", handle.tag())))
}

fn seq(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    machine.push(Sequence::new().into_value());
    Ok(())
}

fn seq_push(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let item = machine.pop()?;
    let handle = top_sequence(machine, "seq-push")?;
    sequence(&handle)?.push(item);
    Ok(())
}

fn len(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let handle = top_sequence(machine, "len")?;
    let n = sequence(&handle)?.len();
    let n = i64::try_from(n).map_err(|_| invalid_param("sequence too long"))?;
    machine.push(n);
    Ok(())
}

fn seq_get(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let index = pop_integer(machine, "seq-get")?;
    let handle = top_sequence(machine, "seq-get")?;
    let seq = sequence(&handle)?;
    let item = usize::try_from(index)
        .ok()
        .and_then(|i| seq.get(i))
        .ok_or_else(|| {
            invalid_param(format!(
                "seq-get index {index} out of range for length {}",
                seq.len()
            ))
        })?;
    machine.push(item);
    Ok(())
}

fn pop_seq(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let handle = pop_opaque(machine, "pop-seq")?;
    if handle.tag() != SEQUENCE_TAG {
        return Err(invalid_param(format!(
            "pop-seq expected a sequence, got <{}>",
            handle.tag()
        )));
    }
    Ok(())
}

fn print_seq(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    let handle = top_sequence(machine, ".seq")?;
    let items = sequence(&handle)?.to_vec();
    let mut line = format!("<sequence {}>", items.len());
    for item in &items {
        let _ = write!(line, " {}", item.display(machine.dictionary()));
    }
    machine.stdout().println(&line);
    Ok(())
}

fn ascending(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    sort(machine, "ascending", false)
}

fn descending(machine: &mut Machine, _: Invocation<'_>) -> VmResult<()> {
    sort(machine, "descending", true)
}

/// Resolve the key word operand.
fn key_word(machine: &Machine, word: &str, key: &Value) -> VmResult<EntryId> {
    match key {
        Value::WordRef(id) => Ok(*id),
        Value::Str(name) => machine
            .dictionary()
            .find(name)
            .ok_or_else(|| unknown_word(name)),
        other => Err(type_mismatch(word, "a key word", other)),
    }
}

/// Run the key word on one item: ( x -- x key ).
fn sort_key(machine: &mut Machine, word: &str, key: EntryId, item: Value) -> VmResult<Value> {
    let depth = machine.data().depth();
    machine.push(item);
    machine.execute(key)?;
    if machine.data().depth() != depth + 2 {
        return Err(invalid_param(format!(
            "{word} key {} must leave the item and one key ( x -- x key )",
            machine.dictionary().get(key).name()
        )));
    }
    let key = machine.pop()?;
    machine.pop()?;
    Ok(key)
}

fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn sort(machine: &mut Machine, word: &str, descending: bool) -> VmResult<()> {
    let key = machine.pop()?;
    let key = key_word(machine, word, &key)?;
    let handle = top_sequence(machine, word)?;
    // no borrow of the sequence is held while key words run
    let items = sequence(&handle)?.to_vec();

    let mut keyed = Vec::with_capacity(items.len());
    for item in items {
        let k = sort_key(machine, word, key, item.clone())?;
        keyed.push((k, item));
    }

    if let Some((first, _)) = keyed.first() {
        let sortable = matches!(first, Value::Integer(_) | Value::Float(_) | Value::Str(_));
        let kind = mem::discriminant(first);
        if !sortable || keyed.iter().any(|(k, _)| mem::discriminant(k) != kind) {
            return Err(invalid_param(format!(
                "{word} keys must be all integers, all floats or all strings"
            )));
        }
    }

    if descending {
        keyed.sort_by(|(a, _), (b, _)| compare_keys(b, a));
    } else {
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    }
    sequence(&handle)?.replace(keyed.into_iter().map(|(_, item)| item).collect());
    Ok(())
}
