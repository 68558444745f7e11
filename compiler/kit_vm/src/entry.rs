//! Dictionary entries: named, executable units.

use std::rc::Rc;

use bitflags::bitflags;

use crate::value::{NativeRoutine, Value};

/// Longest entry name, in bytes.
pub const MAX_NAME_LEN: usize = 127;

bitflags! {
    /// Per-entry state bits.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct EntryFlags: u8 {
        /// Executes during compilation instead of being appended.
        const IMMEDIATE = 1 << 0;
        /// The body is final (cleared while a colon definition is open).
        const COMPLETE = 1 << 1;
        /// Skipped by lookup: a definition abandoned by an error.
        const HIDDEN = 1 << 2;
    }
}

/// How an entry runs.
#[derive(Copy, Clone)]
pub enum Dispatch {
    /// Call a native routine; the body, if any, holds its parameters.
    Native(NativeRoutine),
    /// Thread through the compiled body.
    Interpret,
}

/// A named entry in the dictionary.
///
/// The body sits behind an `Rc` so the engine can hold it in an execution
/// cursor while the machine stays mutably borrowed. Appends go through
/// `Rc::make_mut`, which only copies if a cursor still shares the body.
#[derive(Clone)]
pub struct Entry {
    name: String,
    flags: EntryFlags,
    body: Rc<Vec<Value>>,
    dispatch: Dispatch,
}

impl Entry {
    /// A fresh, incomplete entry that interprets its (empty) body.
    pub(crate) fn new(name: &str) -> Self {
        Entry {
            name: bounded_name(name).to_string(),
            flags: EntryFlags::empty(),
            body: Rc::new(Vec::new()),
            dispatch: Dispatch::Interpret,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    #[inline]
    pub fn is_immediate(&self) -> bool {
        self.flags.contains(EntryFlags::IMMEDIATE)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.flags.contains(EntryFlags::COMPLETE)
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(EntryFlags::HIDDEN)
    }

    /// Take the entry out of name lookup. Existing handles still resolve.
    pub fn hide(&mut self) {
        self.flags.insert(EntryFlags::HIDDEN);
    }

    pub fn set_immediate(&mut self, immediate: bool) {
        self.flags.set(EntryFlags::IMMEDIATE, immediate);
    }

    pub fn mark_complete(&mut self) {
        self.flags.insert(EntryFlags::COMPLETE);
    }

    #[inline]
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// Install a native routine. Native entries are complete on arrival.
    pub fn set_routine(&mut self, routine: NativeRoutine) {
        self.dispatch = Dispatch::Native(routine);
        self.mark_complete();
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        matches!(self.dispatch, Dispatch::Native(_))
    }

    #[inline]
    pub fn body(&self) -> &[Value] {
        &self.body
    }

    /// Shared handle to the body for an execution cursor.
    pub(crate) fn shared_body(&self) -> Rc<Vec<Value>> {
        Rc::clone(&self.body)
    }

    pub fn body_mut(&mut self) -> &mut Vec<Value> {
        Rc::make_mut(&mut self.body)
    }

    pub fn push(&mut self, value: Value) {
        self.body_mut().push(value);
    }
}

/// Truncate `name` to [`MAX_NAME_LEN`] bytes on a char boundary.
pub fn bounded_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
