//! Prompter capability interface.
//!
//! Scalar prompts render through a [`Prompter`], which comes in two
//! flavors selected at construction time: [`RichPrompter`] styles prompt
//! text with the `console` crate and supports masked (hidden) input, and
//! [`PlainPrompter`] uses only plain standard I/O. Styling hints are
//! advisory in both: when the runtime cannot honor them they are ignored
//! silently, never failed on.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use console::{Color, Style, Term};

/// Where prompt text is rendered.
///
/// JSON-structured runs render prompts on stderr so stdout stays
/// machine-readable; interactive runs use stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChannel {
    /// Standard output (interactive mode).
    Stdout,
    /// Standard error (JSON mode).
    Stderr,
}

/// Advisory styling hints for prompt text.
///
/// `color` is a color name ("red", "cyan", ...); unknown names are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptStyle {
    /// Foreground color name, if any.
    pub color: Option<String>,
    /// Render the prompt bold.
    pub bold: bool,
}

impl PromptStyle {
    fn is_plain(&self) -> bool {
        self.color.is_none() && !self.bold
    }
}

/// Terminal-facing side of a scalar prompt.
///
/// Implementations render prompt text and read one line of input per
/// read call. `read_line` and `read_masked` return the decoded line with
/// the terminator stripped, or `None` when stdin is closed.
pub trait Prompter: Send + Sync {
    /// Render prompt text to the given channel.
    fn show(
        &self,
        text: &str,
        style: &PromptStyle,
        use_color: bool,
        channel: PromptChannel,
    ) -> io::Result<()>;

    /// Read one line from stdin.
    fn read_line(&self) -> io::Result<Option<String>>;

    /// Read one line from stdin without echoing the typed characters.
    ///
    /// Implementations that cannot hide input fall back to an ordinary
    /// read; masking is advisory, like styling.
    fn read_masked(&self) -> io::Result<Option<String>>;
}

fn read_stdin_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    let n = io::stdin().lock().read_line(&mut line)?;
    if n == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches('\n').trim_end_matches('\r');
    Ok(Some(line.to_string()))
}

fn write_prompt(text: &str, channel: PromptChannel) -> io::Result<()> {
    match channel {
        PromptChannel::Stdout => {
            let mut out = io::stdout();
            write!(out, "{}", text)?;
            out.flush()
        }
        PromptChannel::Stderr => {
            let mut err = io::stderr();
            write!(err, "{}", text)?;
            err.flush()
        }
    }
}

fn color_by_name(name: &str) -> Option<Color> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

/// Prompter with terminal styling and masked input via the `console`
/// crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct RichPrompter;

impl Prompter for RichPrompter {
    fn show(
        &self,
        text: &str,
        style: &PromptStyle,
        use_color: bool,
        channel: PromptChannel,
    ) -> io::Result<()> {
        if !use_color || style.is_plain() {
            return write_prompt(text, channel);
        }

        let mut styled = Style::new();
        if channel == PromptChannel::Stderr {
            styled = styled.for_stderr();
        }
        if let Some(color) = style.color.as_deref().and_then(color_by_name) {
            styled = styled.fg(color);
        }
        if style.bold {
            styled = styled.bold();
        }
        write_prompt(&styled.apply_to(text).to_string(), channel)
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        read_stdin_line()
    }

    fn read_masked(&self) -> io::Result<Option<String>> {
        let term = Term::stdout();
        if term.is_term() {
            term.read_secure_line().map(Some)
        } else {
            read_stdin_line()
        }
    }
}

/// Prompter using only plain standard I/O.
///
/// Styling hints are ignored and masked reads degrade to ordinary reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPrompter;

impl Prompter for PlainPrompter {
    fn show(
        &self,
        text: &str,
        _style: &PromptStyle,
        _use_color: bool,
        channel: PromptChannel,
    ) -> io::Result<()> {
        write_prompt(text, channel)
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        read_stdin_line()
    }

    fn read_masked(&self) -> io::Result<Option<String>> {
        read_stdin_line()
    }
}

enum MockRead {
    Line(String),
    Fail(String),
}

/// Mock prompter for testing.
///
/// Returns scripted responses and records every rendered prompt together
/// with the channel it was rendered on.
pub struct MockPrompter {
    responses: Mutex<VecDeque<MockRead>>,
    shown: Mutex<Vec<(PromptChannel, String)>>,
    masked_reads: AtomicUsize,
}

impl MockPrompter {
    /// Create a mock that returns the given response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::with_responses([response.into()])
    }

    /// Create a mock that returns multiple responses in sequence.
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| MockRead::Line(r.into()))
                    .collect(),
            ),
            shown: Mutex::new(Vec::new()),
            masked_reads: AtomicUsize::new(0),
        }
    }

    /// Create a mock that simulates closed stdin (Ctrl+D).
    pub fn closed() -> Self {
        Self::with_responses(Vec::<String>::new())
    }

    /// Create a mock whose reads fail with an I/O error.
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([MockRead::Fail(error.into())])),
            shown: Mutex::new(Vec::new()),
            masked_reads: AtomicUsize::new(0),
        }
    }

    /// Every prompt rendered so far, with its channel.
    pub fn shown(&self) -> Vec<(PromptChannel, String)> {
        self.shown.lock().unwrap().clone()
    }

    /// How many reads were masked.
    pub fn masked_read_count(&self) -> usize {
        self.masked_reads.load(Ordering::SeqCst)
    }

    fn pop(&self) -> io::Result<Option<String>> {
        match self.responses.lock().unwrap().pop_front() {
            Some(MockRead::Line(line)) => Ok(Some(line)),
            Some(MockRead::Fail(msg)) => Err(io::Error::other(msg)),
            None => Ok(None),
        }
    }
}

impl Prompter for MockPrompter {
    fn show(
        &self,
        text: &str,
        _style: &PromptStyle,
        _use_color: bool,
        channel: PromptChannel,
    ) -> io::Result<()> {
        self.shown.lock().unwrap().push((channel, text.to_string()));
        Ok(())
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        self.pop()
    }

    fn read_masked(&self) -> io::Result<Option<String>> {
        self.masked_reads.fetch_add(1, Ordering::SeqCst);
        self.pop()
    }
}
