//! The execution engine.
//!
//! Native entries are called directly. Compiled entries are threaded: the
//! caller's cursor is saved on the return stack, a fresh cursor walks the
//! body, word references recurse into [`Machine::execute`] and pseudo-entries
//! call their routine in place. A frame ends when its saved cursor is popped,
//! either by the `(exit)` node `;` compiles or implicitly when the body runs
//! out.

use std::rc::Rc;

use tracing::trace;

use super::Machine;
use crate::dictionary::EntryId;
use crate::entry::Dispatch;
use crate::errors::{malformed_body, VmResult};
use crate::stack::Cursor;
use crate::stack_guard::ensure_sufficient_stack;
use crate::value::{Invocation, Value};

impl Machine {
    /// Run one entry to completion.
    ///
    /// On error the machine is left mid-flight; the interpreter loop calls
    /// [`Machine::reset`] before going on, and embedders calling this
    /// directly should do the same.
    pub fn execute(&mut self, id: EntryId) -> VmResult<()> {
        let entry = self.dictionary.get(id);
        trace!(word = entry.name(), depth = self.returns.depth(), "execute");
        match entry.dispatch() {
            Dispatch::Native(routine) => routine(self, Invocation::Entry(id)),
            Dispatch::Interpret => {
                if !entry.is_complete() {
                    return Err(malformed_body(format!(
                        "{} was never completed",
                        entry.name()
                    )));
                }
                let body = entry.shared_body();
                ensure_sufficient_stack(|| self.thread(id, body))
            }
        }
    }

    fn thread(&mut self, id: EntryId, body: Rc<Vec<Value>>) -> VmResult<()> {
        let caller = self.cursor.take();
        self.returns.push(caller)?;
        let depth = self.returns.depth();
        self.cursor = Some(Cursor::new(id, body));

        while self.returns.depth() == depth {
            let Some(cursor) = self.cursor.as_mut() else {
                return Err(malformed_body("execution cursor lost"));
            };
            let body = Rc::clone(cursor.body());
            let at = cursor.advance();
            match body.get(at) {
                None => {
                    self.cursor = self.returns.pop()?;
                }
                Some(Value::WordRef(target)) => self.execute(*target)?,
                Some(Value::Pseudo(node)) => (node.routine())(self, Invocation::Pseudo(node))?,
                Some(other) => {
                    return Err(malformed_body(format!(
                        "{} at {at} in {}",
                        other.type_name(),
                        self.dictionary.get(id).name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Reposition the cursor within the body being threaded.
    pub fn jump(&mut self, target: usize) -> VmResult<()> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| malformed_body("jump outside a compiled body"))?;
        if target > cursor.body_len() {
            return Err(malformed_body(format!(
                "jump target {target} past end of body ({})",
                cursor.body_len()
            )));
        }
        cursor.jump(target);
        Ok(())
    }

    /// Return from the body being threaded to its caller.
    pub fn exit_frame(&mut self) -> VmResult<()> {
        if self.cursor.is_none() {
            return Err(malformed_body("exit outside a compiled body"));
        }
        self.cursor = self.returns.pop()?;
        Ok(())
    }
}
