//! Environment abstractions for testability.
//!
//! This module provides traits that abstract over OS interactions,
//! allowing tests to run without depending on actual terminal state or
//! stdin piping.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Read};
use std::sync::Mutex;

/// Abstraction over stdin reading.
///
/// Both line streams consume stdin through this trait, so tests can feed
/// scripted input (including mid-stream I/O errors) without piping data.
pub trait StdinReader: Send + Sync {
    /// Check if stdin is a terminal (TTY).
    ///
    /// Returns `true` if stdin is interactive, `false` if piped.
    fn is_terminal(&self) -> bool;

    /// Read the next line from stdin, with the line terminator stripped.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&self) -> io::Result<Option<String>>;

    /// Read all remaining content from stdin, blocking until end of input.
    fn read_to_string(&self) -> io::Result<String>;
}

/// Abstraction over terminal attachment checks.
///
/// Mode resolution needs to know whether the standard streams are
/// attached to an interactive terminal; this trait makes that probeable
/// in tests.
pub trait TtyProbe: Send + Sync {
    /// Check if stdin is attached to a terminal.
    fn stdin_is_terminal(&self) -> bool;

    /// Check if stdout is attached to a terminal.
    fn stdout_is_terminal(&self) -> bool;
}

// === Real implementations ===

/// Real stdin reader using std::io.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealStdin;

impl StdinReader for RealStdin {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches('\n').trim_end_matches('\r');
        Ok(Some(line.to_string()))
    }

    fn read_to_string(&self) -> io::Result<String> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

/// Real terminal probe using std::io.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealTty;

impl TtyProbe for RealTty {
    fn stdin_is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn stdout_is_terminal(&self) -> bool {
        io::stdout().is_terminal()
    }
}

// === Mock implementations for testing ===

enum ScriptStep {
    Line(String),
    Fail(String),
}

/// Mock stdin reader for testing.
///
/// Allows tests to simulate terminal stdin, piped content, and read
/// failures partway through a stream.
pub struct MockStdin {
    is_terminal: bool,
    script: Mutex<VecDeque<ScriptStep>>,
}

impl MockStdin {
    /// Create a mock that simulates a terminal (no piped input).
    pub fn terminal() -> Self {
        Self {
            is_terminal: true,
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Create a mock that simulates piped input.
    pub fn piped(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            is_terminal: false,
            script: Mutex::new(content.lines().map(|l| ScriptStep::Line(l.to_string())).collect()),
        }
    }

    /// Create a mock that simulates empty piped input.
    pub fn piped_empty() -> Self {
        Self {
            is_terminal: false,
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Create a mock that yields the given content, then fails with an
    /// I/O error instead of reaching end of input.
    pub fn piped_then_error(content: impl Into<String>, error: impl Into<String>) -> Self {
        let mock = Self::piped(content);
        mock.script
            .lock()
            .unwrap()
            .push_back(ScriptStep::Fail(error.into()));
        mock
    }
}

impl StdinReader for MockStdin {
    fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        match self.script.lock().unwrap().pop_front() {
            Some(ScriptStep::Line(line)) => Ok(Some(line)),
            Some(ScriptStep::Fail(msg)) => Err(io::Error::new(io::ErrorKind::InvalidData, msg)),
            None => Ok(None),
        }
    }

    fn read_to_string(&self) -> io::Result<String> {
        let mut script = self.script.lock().unwrap();
        let mut lines = Vec::new();
        while let Some(step) = script.pop_front() {
            match step {
                ScriptStep::Line(line) => lines.push(line),
                ScriptStep::Fail(msg) => {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, msg))
                }
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Mock terminal probe for testing.
#[derive(Debug, Clone, Copy)]
pub struct MockTty {
    stdin: bool,
    stdout: bool,
}

impl MockTty {
    /// Both streams attached to a terminal.
    pub fn attended() -> Self {
        Self {
            stdin: true,
            stdout: true,
        }
    }

    /// Neither stream attached to a terminal (piped/CI).
    pub fn detached() -> Self {
        Self {
            stdin: false,
            stdout: false,
        }
    }

    /// Explicit per-stream attachment.
    pub fn new(stdin: bool, stdout: bool) -> Self {
        Self { stdin, stdout }
    }
}

impl TtyProbe for MockTty {
    fn stdin_is_terminal(&self) -> bool {
        self.stdin
    }

    fn stdout_is_terminal(&self) -> bool {
        self.stdout
    }
}
