//! The interpreter state and the operations that drive it.
//!
//! A [`Machine`] bundles everything one interpreter instance needs: the
//! dictionary, both stacks, the execution cursor, the compile/execute mode,
//! the pending branch patches and the token input queue. Nothing is global,
//! so independent machines can coexist in one process.
//!
//! The operations are split by concern:
//! - `execute`: the threaded-code engine
//! - `compile`: appending to the definition in progress, backpatching
//! - `interpret`: the token loop, error reporting and reset

mod builder;
mod compile;
mod execute;
mod interpret;

use std::collections::VecDeque;

use kit_lexer::{Token, TokenKind};
use smallvec::SmallVec;

use crate::dictionary::{Dictionary, EntryId};
use crate::errors::{invalid_param, missing_name, unknown_word, VmResult};
use crate::output::SharedOutput;
use crate::stack::{Cursor, DataStack, ReturnStack};
use crate::value::{NativeRoutine, Value};

pub use builder::MachineBuilder;

/// Supplies more tokens once the input queue runs dry.
///
/// Returns `None` at end of input. An empty batch (a blank line) is fine;
/// the machine asks again.
pub type Refill = Box<dyn FnMut() -> Option<Vec<Token>>>;

/// Whether tokens are run now or appended to the definition in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Execute,
    Compile,
}

/// One interpreter instance.
pub struct Machine {
    dictionary: Dictionary,
    data: DataStack,
    returns: ReturnStack,
    cursor: Option<Cursor>,
    mode: Mode,
    /// Body indices of branch nodes still waiting for a target.
    patches: SmallVec<[usize; 8]>,
    input: VecDeque<Token>,
    refill: Option<Refill>,
    halted: bool,
    lexicons: Vec<String>,
    stdout: SharedOutput,
    stderr: SharedOutput,
}

impl Machine {
    /// A machine with the core vocabulary, writing to stdout/stderr.
    pub fn new() -> Self {
        MachineBuilder::new().build()
    }

    /// Configure a machine before building it.
    pub fn builder() -> MachineBuilder {
        MachineBuilder::new()
    }

    #[inline]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    #[inline]
    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    /// The data stack.
    #[inline]
    pub fn data(&self) -> &DataStack {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut DataStack {
        &mut self.data
    }

    /// Saved cursors of the compiled calls in progress.
    #[inline]
    pub fn returns(&self) -> &ReturnStack {
        &self.returns
    }

    /// Position in the body being threaded, if any.
    #[inline]
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Stop the interpreter loop after the current token.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Sink for `.`, `.s`, `.d` and `words`.
    #[inline]
    pub fn stdout(&self) -> &SharedOutput {
        &self.stdout
    }

    /// Sink for error reports.
    #[inline]
    pub fn stderr(&self) -> &SharedOutput {
        &self.stderr
    }

    // Stack shorthands for native routines.

    #[inline]
    pub fn push(&mut self, value: impl Into<Value>) {
        self.data.push(value.into());
    }

    /// Pop the data stack; `StackUnderflow` when empty.
    #[inline]
    pub fn pop(&mut self) -> VmResult<Value> {
        self.data.pop()
    }

    #[inline]
    pub fn peek(&self) -> VmResult<&Value> {
        self.data.peek()
    }

    /// Values on the data stack, bottom to top.
    pub fn stack(&self) -> &[Value] {
        self.data.as_slice()
    }

    // Input queue.

    /// Queue tokens for the interpreter loop.
    pub fn feed(&mut self, tokens: impl IntoIterator<Item = Token>) {
        self.input.extend(tokens);
    }

    /// Pull further input from `refill` whenever the queue is empty.
    ///
    /// Queued tokens are still consumed first. The source is dropped once
    /// it reports end of input.
    pub fn set_refill(&mut self, refill: Refill) {
        self.refill = Some(refill);
    }

    /// Stop pulling from the input source, if any.
    pub fn clear_refill(&mut self) {
        self.refill = None;
    }

    /// Tokens still queued.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Take the next token, refilling the queue if it is empty.
    pub fn next_token(&mut self) -> Option<Token> {
        self.fill_input();
        self.input.pop_front()
    }

    /// Take the name operand of a defining word.
    ///
    /// The name may come from a later refill. End of input is left queued
    /// so the loop still sees it.
    pub fn next_name(&mut self, word: &str) -> VmResult<String> {
        self.fill_input();
        match self.input.front() {
            None => Err(missing_name(word)),
            Some(token) if token.is_end() => Err(missing_name(word)),
            Some(_) => {
                let token = self.input.pop_front().ok_or_else(|| missing_name(word))?;
                match token.kind {
                    TokenKind::Word => Ok(token.text),
                    _ => Err(invalid_param(format!(
                        "{word} expected a name, got {} `{token}`",
                        token.kind
                    ))),
                }
            }
        }
    }

    fn fill_input(&mut self) {
        while self.input.is_empty() {
            let Some(refill) = self.refill.as_mut() else {
                return;
            };
            match refill() {
                Some(tokens) => self.input.extend(tokens),
                None => self.refill = None,
            }
        }
    }

    // Extension API.

    /// Register a native word.
    pub fn define_native(&mut self, name: &str, routine: NativeRoutine) -> EntryId {
        self.dictionary.add_native(name, routine)
    }

    /// Register an immediate native word.
    pub fn define_immediate(&mut self, name: &str, routine: NativeRoutine) -> EntryId {
        self.dictionary.add_immediate(name, routine)
    }

    /// Register a native word carrying one parameter cell.
    pub fn define_with_param(
        &mut self,
        name: &str,
        routine: NativeRoutine,
        param: Value,
    ) -> EntryId {
        let id = self.dictionary.add_native(name, routine);
        self.dictionary.get_mut(id).push(param);
        id
    }

    /// Register a lexicon loader word.
    pub fn register_lexicon(&mut self, name: &str, loader: NativeRoutine) -> EntryId {
        self.define_native(name, loader)
    }

    /// Record that lexicon `name` has loaded. False if it already had.
    pub fn mark_lexicon_loaded(&mut self, name: &str) -> bool {
        if self.lexicons.iter().any(|loaded| loaded == name) {
            return false;
        }
        self.lexicons.push(name.to_string());
        true
    }

    /// Resolve `name` and execute it.
    ///
    /// For calling back into native vocabulary from a native routine; the
    /// callee must not depend on the caller's cursor.
    pub fn find_and_execute(&mut self, name: &str) -> VmResult<()> {
        let id = self.dictionary.find(name).ok_or_else(|| unknown_word(name))?;
        self.execute(id)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new()
    }
}

#[cfg(test)]
mod tests;
