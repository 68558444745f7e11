//! Driver for the `kit` command.
//!
//! `kit FILE` interprets a script; `kit` with no argument reads standard
//! input line by line. Both feed one machine carrying the core vocabulary
//! and the lexicon loaders, so definitions may span lines.

use std::cell::RefCell;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Once};

use kit_vm::{lex, LexError, Machine, OutputHandler, SharedOutput};
use tracing::debug;

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber, once, and only when `RUST_LOG` is set.
///
/// `RUST_LOG=kit_vm=trace` shows every dispatched word.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// The input file could not be read.
#[derive(Debug, thiserror::Error)]
#[error("Unable to open file: {}", path.display())]
pub struct OpenError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// A machine with the core vocabulary and every lexicon loader.
pub fn new_machine(stdout: SharedOutput, stderr: SharedOutput) -> Machine {
    let mut machine = Machine::builder().stdout(stdout).stderr(stderr).build();
    kit_lexicons::install(&mut machine);
    machine
}

/// Interpret one chunk of source, reporting a lexer error like any other.
///
/// Returns the number of errors reported.
pub fn run_source(machine: &mut Machine, source: &str) -> usize {
    match machine.interpret_source(source) {
        Ok(errors) => errors,
        Err(err) => {
            report_lex_error(machine.stderr(), &err);
            1
        }
    }
}

/// Interpret the whole of `path`.
pub fn run_file(machine: &mut Machine, path: &Path) -> Result<usize, OpenError> {
    let source = std::fs::read_to_string(path).map_err(|source| OpenError {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "running file");
    Ok(run_source(machine, &source))
}

/// What the line reader saw besides tokens.
#[derive(Default)]
struct LineSession {
    lex_errors: usize,
    failure: Option<io::Error>,
}

/// Interpret `input` one line at a time until it ends or `quit` runs.
///
/// Lines are one token stream: a definition, or a defining word and its
/// name, may continue on the next line. With `prompt`, writes `> ` to the
/// machine's output before each line is read.
pub fn run_lines<R: BufRead + 'static>(
    machine: &mut Machine,
    input: R,
    prompt: bool,
) -> io::Result<usize> {
    let session = Rc::new(RefCell::new(LineSession::default()));
    let reader = Rc::clone(&session);
    let stdout = Arc::clone(machine.stdout());
    let stderr = Arc::clone(machine.stderr());
    let mut lines = input.lines();

    machine.set_refill(Box::new(move || {
        if prompt {
            stdout.print("> ");
        }
        let line = match lines.next()? {
            Ok(line) => line,
            Err(err) => {
                reader.borrow_mut().failure = Some(err);
                return None;
            }
        };
        match lex(&line) {
            Ok(mut tokens) => {
                tokens.retain(|token| !token.is_end());
                Some(tokens)
            }
            Err(err) => {
                report_lex_error(&stderr, &err);
                reader.borrow_mut().lex_errors += 1;
                Some(Vec::new())
            }
        }
    }));
    let errors = machine.run();
    machine.clear_refill();

    let session = session.take();
    match session.failure {
        Some(err) => Err(err),
        None => Ok(errors + session.lex_errors),
    }
}

fn report_lex_error(stderr: &OutputHandler, err: &LexError) {
    debug!(offset = err.offset, "lex error");
    stderr.println(&format!("LexError: {err}"));
}

#[cfg(test)]
mod tests;
