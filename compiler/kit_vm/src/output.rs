//! Output sinks for printing words and diagnostics.
//!
//! A machine holds two sinks: one for normal output (`.`, `.s`, `.d`,
//! `words`) and one for error reports. Embedders and tests swap in a
//! [`OutputHandler::Buffer`] to capture text instead of writing to the
//! terminal.
//!
//! Enum dispatch, not a trait object: the set of sinks is closed.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Sink that captures everything written to it.
#[derive(Default)]
pub struct BufferOutput {
    buffer: Mutex<String>,
}

impl BufferOutput {
    /// An empty buffer.
    pub fn new() -> Self {
        BufferOutput::default()
    }

    pub fn print(&self, msg: &str) {
        self.buffer.lock().push_str(msg);
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

pub enum OutputHandler {
    Stdout,
    Stderr,
    Buffer(BufferOutput),
    /// Discards everything.
    Silent,
}

impl OutputHandler {
    /// Write without a trailing newline.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                // a closed pipe is not an interpreter error
                let _ = out.write_all(msg.as_bytes());
                let _ = out.flush();
            }
            Self::Stderr => {
                let _ = std::io::stderr().lock().write_all(msg.as_bytes());
            }
            Self::Buffer(h) => h.print(msg),
            Self::Silent => {}
        }
    }

    /// Write `msg` and a newline.
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => {
                let _ = writeln!(std::io::stdout().lock(), "{msg}");
            }
            Self::Stderr => {
                let _ = writeln!(std::io::stderr().lock(), "{msg}");
            }
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    /// Captured text. Empty for sinks that don't capture.
    pub fn contents(&self) -> String {
        match self {
            Self::Buffer(h) => h.contents(),
            Self::Stdout | Self::Stderr | Self::Silent => String::new(),
        }
    }

    /// Drop captured text. No-op for sinks that don't capture.
    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// A sink shared between a machine and whoever wants to read it back.
pub type SharedOutput = Arc<OutputHandler>;

/// Sink writing to the process's stdout.
pub fn stdout_handler() -> SharedOutput {
    Arc::new(OutputHandler::Stdout)
}

/// Sink writing to the process's stderr.
pub fn stderr_handler() -> SharedOutput {
    Arc::new(OutputHandler::Stderr)
}

/// Sink capturing output in memory, for tests and embedders.
pub fn buffer_handler() -> SharedOutput {
    Arc::new(OutputHandler::Buffer(BufferOutput::new()))
}

/// Sink discarding everything.
pub fn silent_handler() -> SharedOutput {
    Arc::new(OutputHandler::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn buffer_captures_print_and_println() {
        let handler = buffer_handler();
        handler.print("<1> ");
        handler.println("42");
        assert_eq!(handler.contents(), "<1> 42\n");
    }

    #[test]
    fn buffer_clear_empties_it() {
        let handler = buffer_handler();
        handler.println("hello");
        handler.clear();
        assert!(handler.contents().is_empty());
    }

    #[test]
    fn silent_discards() {
        let handler = silent_handler();
        handler.println("hello");
        handler.clear();
        assert_eq!(handler.contents(), "");
    }

    #[test]
    fn terminal_sinks_capture_nothing() {
        assert_eq!(stdout_handler().contents(), "");
        assert_eq!(stderr_handler().contents(), "");
    }

    #[test]
    fn shared_buffer_sees_writes_through_clones() {
        let handler = buffer_handler();
        let writer = Arc::clone(&handler);
        writer.println("a");
        writer.println("b");
        assert_eq!(handler.contents().lines().count(), 2);
    }
}
