//! The tagged value carried on stacks and inside definition bodies.
//!
//! Ownership is encoded in the variants themselves:
//!
//! - `Str` and `Pseudo` own their payload. `Clone` deep-copies it, so a value
//!   copied from a body onto the data stack never aliases the body.
//! - `WordRef` is an [`EntryId`], an index into the dictionary. Dropping it
//!   releases nothing.
//! - `Opaque` holds a reference-counted handle created by an extension.
//!   Copies share the handle; the core never inspects or frees the payload.
//!
//! Dropping a value is the "free" operation: owned payloads are released
//! recursively and borrowed ones are left alone.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::dictionary::{Dictionary, EntryId};
use crate::errors::VmResult;
use crate::machine::Machine;

/// Signature of every native routine.
///
/// The invocation tells the routine what it was called as: a named entry
/// (look it up through the machine's dictionary) or an inline pseudo-entry
/// (whose parameters are borrowed directly).
pub type NativeRoutine = fn(&mut Machine, Invocation<'_>) -> VmResult<()>;

/// The context a native routine runs with.
#[derive(Copy, Clone, Debug)]
pub enum Invocation<'a> {
    /// Executed as a dictionary entry.
    Entry(EntryId),
    /// Executed as an inline node of a compiled body.
    Pseudo(&'a PseudoEntry),
}

impl Invocation<'_> {
    /// The entry this routine was invoked as, if any.
    pub fn entry(self) -> Option<EntryId> {
        match self {
            Invocation::Entry(id) => Some(id),
            Invocation::Pseudo(_) => None,
        }
    }
}

/// An anonymous entry embedded by value in a compiled body.
///
/// Used for literal pushes and compiled branches. The body holds the node's
/// parameters (the literal, or the jump target once patched).
#[derive(Clone)]
pub struct PseudoEntry {
    name: &'static str,
    routine: NativeRoutine,
    body: Vec<Value>,
}

impl PseudoEntry {
    /// A node with no parameters yet.
    pub fn new(name: &'static str, routine: NativeRoutine) -> Self {
        PseudoEntry {
            name,
            routine,
            body: Vec::new(),
        }
    }

    /// Append a parameter, builder style.
    #[must_use]
    pub fn with_param(mut self, value: Value) -> Self {
        self.body.push(value);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn routine(&self) -> NativeRoutine {
        self.routine
    }

    #[inline]
    pub fn body(&self) -> &[Value] {
        &self.body
    }

    /// The first parameter, which every core pseudo-entry routine reads.
    #[inline]
    pub fn param0(&self) -> Option<&Value> {
        self.body.first()
    }

    /// Append a parameter in place, as branch patching does.
    pub fn push(&mut self, value: Value) {
        self.body.push(value);
    }
}

impl fmt::Debug for PseudoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PseudoEntry")
            .field("name", &self.name)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PseudoEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.body == other.body
    }
}

/// An extension-owned object passed through the stacks.
///
/// The tag is a human-readable type name for diagnostics and for extensions
/// to check what they were handed.
#[derive(Clone)]
pub struct Opaque {
    handle: Rc<dyn Any>,
    tag: Cow<'static, str>,
}

impl Opaque {
    /// Take ownership of `object`; copies of the value share it.
    pub fn new<T: Any>(object: T, tag: impl Into<Cow<'static, str>>) -> Self {
        Opaque {
            handle: Rc::new(object),
            tag: tag.into(),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The object as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref::<T>()
    }

    /// Whether two opaque values share the same underlying object.
    pub fn same_object(&self, other: &Opaque) -> bool {
        Rc::ptr_eq(&self.handle, &other.handle)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.tag)
    }
}

/// Runtime value. Exactly one variant is active.
#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Str(String),
    /// Non-owning reference to a dictionary entry.
    WordRef(EntryId),
    Native(NativeRoutine),
    /// Inline anonymous entry; owns its body.
    Pseudo(Box<PseudoEntry>),
    Opaque(Opaque),
}

impl Value {
    /// An owned string value.
    pub fn string(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    /// Embed a pseudo-entry, boxed.
    pub fn pseudo(entry: PseudoEntry) -> Self {
        Value::Pseudo(Box::new(entry))
    }

    /// Wrap an extension object under `tag`.
    pub fn opaque<T: Any>(object: T, tag: impl Into<Cow<'static, str>>) -> Self {
        Value::Opaque(Opaque::new(object, tag))
    }

    /// Variant name used in `InvalidParam` diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::WordRef(_) => "word reference",
            Value::Native(_) => "native routine",
            Value::Pseudo(_) => "pseudo-entry",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Truth value for conditional branches. Only numbers have one.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Value::Integer(n) => Some(*n != 0),
            Value::Float(x) => Some(*x != 0.0),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The referenced entry, if this is a `WordRef`.
    pub fn as_word_ref(&self) -> Option<EntryId> {
        match self {
            Value::WordRef(id) => Some(*id),
            _ => None,
        }
    }

    /// The extension handle, if this is an `Opaque`.
    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Value::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// Render for diagnostics, resolving word references to names.
    pub fn display<'a>(&'a self, dictionary: &'a Dictionary) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            dictionary: Some(dictionary),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::WordRef(a), Value::WordRef(b)) => a == b,
            (Value::Pseudo(a), Value::Pseudo(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a.same_object(b),
            // routines have no meaningful identity
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::WordRef(id) => write!(f, "WordRef({id:?})"),
            Value::Native(_) => f.write_str("Native(..)"),
            Value::Pseudo(p) => p.fmt(f),
            Value::Opaque(o) => o.fmt(f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ValueDisplay {
            value: self,
            dictionary: None,
        }
        .fmt(f)
    }
}

/// Display adapter returned by [`Value::display`].
pub struct ValueDisplay<'a> {
    value: &'a Value,
    dictionary: Option<&'a Dictionary>,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::WordRef(id) => match self.dictionary {
                Some(dict) => write!(f, "'{}", dict.get(*id).name()),
                None => write!(f, "'#{}", id.index()),
            },
            Value::Native(_) => f.write_str("<native>"),
            Value::Pseudo(p) => {
                f.write_str(p.name())?;
                for param in p.body() {
                    write!(f, " ")?;
                    ValueDisplay {
                        value: param,
                        dictionary: self.dictionary,
                    }
                    .fmt(f)?;
                }
                Ok(())
            }
            Value::Opaque(o) => write!(f, "<{}>", o.tag()),
        }
    }
}

#[cfg(test)]
mod tests;
