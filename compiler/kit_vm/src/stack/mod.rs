//! The data stack and the return stack.
//!
//! The data stack owns its values: `push` moves a value in, `pop` moves it
//! back out to the caller. The return stack holds execution cursors, which
//! are positions in a body rather than owned data.

use std::rc::Rc;

use crate::dictionary::EntryId;
use crate::errors::{recursion_limit_exceeded, stack_underflow, VmResult};
use crate::value::Value;

/// Default cap on nested compiled-entry calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 4096;

/// LIFO store of owned values.
#[derive(Clone, Debug, Default)]
pub struct DataStack {
    values: Vec<Value>,
}

impl DataStack {
    /// An empty stack.
    pub fn new() -> Self {
        DataStack::default()
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Remove the top value. An empty stack stays empty.
    pub fn pop(&mut self) -> VmResult<Value> {
        self.values.pop().ok_or_else(|| stack_underflow("data stack"))
    }

    /// Borrow the top value without removing it.
    pub fn peek(&self) -> VmResult<&Value> {
        self.values.last().ok_or_else(|| stack_underflow("data stack"))
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values from bottom to top.
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Values from bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Value> {
        self.values.iter()
    }
}

/// Position of the next value to run within a compiled body.
#[derive(Clone)]
pub struct Cursor {
    owner: EntryId,
    body: Rc<Vec<Value>>,
    offset: usize,
}

impl Cursor {
    pub(crate) fn new(owner: EntryId, body: Rc<Vec<Value>>) -> Self {
        Cursor {
            owner,
            body,
            offset: 0,
        }
    }

    /// The entry whose body this cursor walks.
    #[inline]
    pub fn owner(&self) -> EntryId {
        self.owner
    }

    /// Index of the next cell to run.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn body(&self) -> &Rc<Vec<Value>> {
        &self.body
    }

    pub(crate) fn jump(&mut self, target: usize) {
        self.offset = target;
    }

    pub(crate) fn advance(&mut self) -> usize {
        let at = self.offset;
        self.offset += 1;
        at
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cursor({:?}@{}/{})", self.owner, self.offset, self.body.len())
    }
}

/// Saved cursors of suspended callers.
///
/// A frame is `None` when the caller was not itself threading a body (the
/// interpreter loop or a native routine at top level).
#[derive(Debug)]
pub struct ReturnStack {
    frames: Vec<Option<Cursor>>,
    max_depth: Option<usize>,
}

impl ReturnStack {
    /// `None` leaves the depth unbounded.
    pub fn new(max_depth: Option<usize>) -> Self {
        ReturnStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Save a caller's cursor; `StackOverflow` past the depth cap.
    pub fn push(&mut self, cursor: Option<Cursor>) -> VmResult<()> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(cursor);
        Ok(())
    }

    /// Restore the most recent caller's cursor.
    pub fn pop(&mut self) -> VmResult<Option<Cursor>> {
        self.frames
            .pop()
            .ok_or_else(|| stack_underflow("return stack"))
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

impl Default for ReturnStack {
    fn default() -> Self {
        ReturnStack::new(Some(DEFAULT_MAX_CALL_DEPTH))
    }
}
