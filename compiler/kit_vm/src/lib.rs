//! The kit interpreter core.
//!
//! A small threaded-code virtual machine for a Forth-derived command
//! language. Tokens come in (see `kit_lexer`), are looked up in a mutable
//! dictionary, and are either executed right away or compiled into the body
//! of the definition in progress. Vocabularies ("lexicons") extend the
//! dictionary at run time through the same API the core words use.
//!
//! ```text
//! let mut machine = Machine::new();
//! machine.interpret_source(": double dup + ; 21 double .")?;   // prints 42
//! ```
//!
//! # Modules
//!
//! - [`value`]: the tagged value carried on stacks and in bodies
//! - [`dictionary`] / [`entry`]: named entries, newest-first lookup
//! - [`stack`]: data stack, return stack, execution cursor
//! - [`machine`]: engine, compiler and interpreter loop
//! - [`vocabulary`]: the core words and helpers for writing native ones
//! - [`output`]: where printing words and error reports go

pub mod dictionary;
pub mod entry;
mod errors;
pub mod machine;
pub mod output;
pub mod stack;
mod stack_guard;
pub mod value;
pub mod vocabulary;

pub use dictionary::{Dictionary, EntryId};
pub use entry::{Entry, EntryFlags, MAX_NAME_LEN};
pub use errors::{
    compile_only, division_by_zero, invalid_param, malformed_body, missing_name,
    recursion_limit_exceeded, stack_underflow, type_mismatch, unbalanced_control,
    unknown_token_type, unknown_word, VmError, VmErrorKind, VmResult,
};
pub use machine::{Machine, MachineBuilder, Mode, Refill};
pub use output::{
    buffer_handler, silent_handler, stderr_handler, stdout_handler, OutputHandler, SharedOutput,
};
pub use stack::{Cursor, DataStack, ReturnStack, DEFAULT_MAX_CALL_DEPTH};
pub use stack_guard::ensure_sufficient_stack;
pub use value::{Invocation, NativeRoutine, Opaque, PseudoEntry, Value};

pub use kit_lexer::{lex, LexError, Token, TokenKind};
