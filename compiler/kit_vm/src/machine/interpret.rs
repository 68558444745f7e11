//! The interpreter loop.

use kit_lexer::{lex, LexError, Token, TokenKind};
use tracing::debug;

use super::compile::literal_value;
use super::{Machine, Mode};
use crate::errors::{unknown_token_type, unknown_word, VmError, VmResult};

impl Machine {
    /// Route one token according to the current mode.
    pub fn interpret(&mut self, token: Token) -> VmResult<()> {
        if self.mode == Mode::Compile {
            return self.compile(token);
        }
        match token.kind {
            TokenKind::Word => {
                let id = self
                    .dictionary
                    .find(&token.text)
                    .ok_or_else(|| unknown_word(&token.text))?;
                self.execute(id)
            }
            TokenKind::Integer | TokenKind::Float | TokenKind::String => {
                let value = literal_value(&token)?;
                self.data.push(value);
                Ok(())
            }
            TokenKind::EndOfInput => Err(unknown_token_type(&token)),
        }
    }

    /// Drain the input queue.
    ///
    /// Stops at end of input, when the queue runs dry and nothing refills
    /// it, or once the machine halts. An error is reported, the machine is
    /// reset, and the loop goes on with the next token. Returns the number of errors reported.
    pub fn run(&mut self) -> usize {
        let mut errors = 0;
        while !self.halted {
            let Some(token) = self.next_token() else {
                break;
            };
            if token.is_end() {
                break;
            }
            if let Err(err) = self.interpret(token) {
                errors += 1;
                self.report(&err);
                self.reset();
            }
        }
        errors
    }

    /// Lex `source`, queue its tokens and run them.
    ///
    /// A lexer error leaves the machine untouched.
    pub fn interpret_source(&mut self, source: &str) -> Result<usize, LexError> {
        let tokens = lex(source)?;
        self.feed(tokens);
        Ok(self.run())
    }

    /// Write `err` to the error sink.
    pub fn report(&self, err: &VmError) {
        debug!(kind = ?err.kind, context = %err.context, "error");
        self.stderr.println(&err.to_string());
    }

    /// Return to a clean execute state: both stacks emptied, no cursor, no
    /// pending branches. The input queue is kept.
    ///
    /// A definition left open is hidden, so lookup falls back to whatever
    /// the name meant before it.
    pub fn reset(&mut self) {
        debug!(
            data = self.data.depth(),
            returns = self.returns.depth(),
            "reset"
        );
        if self.mode == Mode::Compile {
            self.abandon_definition();
        }
        self.data.clear();
        self.returns.clear();
        self.cursor = None;
        self.patches.clear();
        self.mode = Mode::Execute;
    }

    fn abandon_definition(&mut self) {
        let Some(id) = self.dictionary.latest() else {
            return;
        };
        let entry = self.dictionary.get_mut(id);
        if !entry.is_complete() {
            debug!(word = entry.name(), "abandon definition");
            entry.hide();
        }
    }
}
