//! Compile mode: appending to the definition in progress.
//!
//! Every compiled body is homogeneous. Words become `WordRef`s, literals
//! become `(literal)` pseudo-entries, and control words (immediate) emit
//! branch pseudo-entries whose targets are patched in later.

use kit_lexer::{Token, TokenKind};
use tracing::debug;

use super::{Machine, Mode};
use crate::dictionary::EntryId;
use crate::errors::{
    invalid_param, malformed_body, unbalanced_control, unknown_token_type, unknown_word,
    VmResult,
};
use crate::value::{PseudoEntry, Value};
use crate::vocabulary::control::literal_node;

impl Machine {
    /// Append one token to the latest entry's body.
    pub fn compile(&mut self, token: Token) -> VmResult<()> {
        match token.kind {
            TokenKind::Word => {
                let id = self
                    .dictionary
                    .find(&token.text)
                    .ok_or_else(|| unknown_word(&token.text))?;
                if self.dictionary.get(id).is_immediate() {
                    self.execute(id)
                } else {
                    self.append(Value::WordRef(id))
                }
            }
            TokenKind::Integer | TokenKind::Float | TokenKind::String => {
                let literal = literal_value(&token)?;
                self.append(literal_node(literal))
            }
            TokenKind::EndOfInput => Err(unknown_token_type(&token)),
        }
    }

    /// Open a colon definition named `name`.
    pub fn begin_definition(&mut self, name: &str) -> EntryId {
        let id = self.dictionary.add(name);
        self.mode = Mode::Compile;
        self.patches.clear();
        debug!(word = self.dictionary.get(id).name(), "begin definition");
        id
    }

    /// Close the definition in progress.
    ///
    /// Rejects a body with unpatched branches; the entry then stays
    /// incomplete.
    pub fn end_definition(&mut self) -> VmResult<()> {
        let id = self.definition()?;
        if !self.patches.is_empty() {
            return Err(unbalanced_control(format!(
                "{} closed with {} unresolved branch(es)",
                self.dictionary.get(id).name(),
                self.patches.len()
            )));
        }
        let entry = self.dictionary.get_mut(id);
        entry.mark_complete();
        debug!(word = entry.name(), cells = entry.body().len(), "end definition");
        self.mode = Mode::Execute;
        Ok(())
    }

    /// Append to the latest entry's body.
    pub fn append(&mut self, value: Value) -> VmResult<()> {
        let id = self.definition()?;
        self.dictionary.get_mut(id).push(value);
        Ok(())
    }

    /// Current length of the latest entry's body.
    pub fn here(&self) -> VmResult<usize> {
        let id = self.definition()?;
        Ok(self.dictionary.get(id).body().len())
    }

    /// Append a branch node and remember it for patching.
    pub fn append_branch(&mut self, node: PseudoEntry) -> VmResult<()> {
        let at = self.here()?;
        self.append(Value::pseudo(node))?;
        self.patches.push(at);
        Ok(())
    }

    /// Take the most recent unpatched branch.
    pub fn pop_patch(&mut self, word: &str) -> VmResult<usize> {
        self.patches
            .pop()
            .ok_or_else(|| unbalanced_control(format!("{word} without a matching if")))
    }

    /// Give the branch node at `at` its target.
    pub fn patch(&mut self, at: usize, target: usize) -> VmResult<()> {
        let id = self.definition()?;
        let target = i64::try_from(target)
            .map_err(|_| malformed_body(format!("branch target {target} out of range")))?;
        match self.dictionary.get_mut(id).body_mut().get_mut(at) {
            Some(Value::Pseudo(node)) => {
                node.push(Value::Integer(target));
                Ok(())
            }
            _ => Err(malformed_body(format!("no branch at {at} to patch"))),
        }
    }

    /// Branches waiting for a target, oldest first.
    pub fn pending_patches(&self) -> &[usize] {
        &self.patches
    }

    fn definition(&self) -> VmResult<EntryId> {
        self.dictionary
            .latest()
            .ok_or_else(|| malformed_body("no definition in progress"))
    }
}

/// Materialise a literal token.
pub fn literal_value(token: &Token) -> VmResult<Value> {
    match token.kind {
        TokenKind::Integer => token
            .text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| invalid_param(format!("integer literal out of range: {}", token.text))),
        TokenKind::Float => token
            .text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid_param(format!("bad float literal: {}", token.text))),
        TokenKind::String => Ok(Value::string(token.text.as_str())),
        TokenKind::Word | TokenKind::EndOfInput => Err(unknown_token_type(token)),
    }
}
