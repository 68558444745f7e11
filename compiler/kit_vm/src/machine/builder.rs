//! `MachineBuilder` for configuring interpreter instances.

use std::collections::VecDeque;

use smallvec::SmallVec;

use super::{Machine, Mode};
use crate::dictionary::Dictionary;
use crate::output::{stderr_handler, stdout_handler, SharedOutput};
use crate::stack::{DataStack, ReturnStack, DEFAULT_MAX_CALL_DEPTH};
use crate::vocabulary;

/// Builder for [`Machine`].
///
/// Defaults: core vocabulary installed, call depth capped at
/// [`DEFAULT_MAX_CALL_DEPTH`], output to the process's stdout and stderr.
pub struct MachineBuilder {
    max_call_depth: Option<usize>,
    stdout: Option<SharedOutput>,
    stderr: Option<SharedOutput>,
    core_vocabulary: bool,
}

impl MachineBuilder {
    pub fn new() -> Self {
        MachineBuilder {
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            stdout: None,
            stderr: None,
            core_vocabulary: true,
        }
    }

    /// Cap on nested compiled-entry calls. `None` leaves only the native
    /// stack as a limit.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Sink for printing words.
    #[must_use]
    pub fn stdout(mut self, handler: SharedOutput) -> Self {
        self.stdout = Some(handler);
        self
    }

    /// Sink for error reports.
    #[must_use]
    pub fn stderr(mut self, handler: SharedOutput) -> Self {
        self.stderr = Some(handler);
        self
    }

    /// Whether to bootstrap the core vocabulary. Without it the dictionary
    /// starts empty.
    #[must_use]
    pub fn core_vocabulary(mut self, install: bool) -> Self {
        self.core_vocabulary = install;
        self
    }

    pub fn build(self) -> Machine {
        let mut machine = Machine {
            dictionary: Dictionary::new(),
            data: DataStack::new(),
            returns: ReturnStack::new(self.max_call_depth),
            cursor: None,
            mode: Mode::Execute,
            patches: SmallVec::new(),
            input: VecDeque::new(),
            refill: None,
            halted: false,
            lexicons: Vec::new(),
            stdout: self.stdout.unwrap_or_else(stdout_handler),
            stderr: self.stderr.unwrap_or_else(stderr_handler),
        };
        if self.core_vocabulary {
            vocabulary::install(&mut machine);
        }
        machine
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
