//! Loadable vocabularies.
//!
//! [`install`] registers one loader word per lexicon. Nothing else is added
//! until a loader runs, e.g. `lex-stats` in a script. A loader registers its
//! dependencies first, so its own words are found ahead of theirs.
//!
//! Lexicons only use the public machine API; they get no access to engine
//! internals.

mod sequence;
mod stats;

use kit_vm::Machine;

pub use sequence::{Sequence, SEQUENCE_TAG};

/// Loader word for the sequence lexicon.
pub const LEX_SEQUENCE: &str = "lex-sequence";
/// Loader word for the statistics lexicon.
pub const LEX_STATS: &str = "lex-stats";

/// Register the loader words.
pub fn install(machine: &mut Machine) {
    machine.register_lexicon(LEX_SEQUENCE, sequence::load);
    machine.register_lexicon(LEX_STATS, stats::load);
}
