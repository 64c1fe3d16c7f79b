//! Uniform stdin reading for CLI applications.
//!
//! `inlet` lets command-line tools read standard input the same way
//! whether a human is typing at a terminal or a harness is piping
//! structured JSON. One mode resolution decides the interpretation; the
//! same entry points then serve both worlds.
//!
//! # Quick Start
//!
//! ```ignore
//! use inlet::{collect, convert, LineStream, ModeResolver, PromptSpec, ScalarPrompt};
//! use std::sync::Arc;
//!
//! let resolver = ModeResolver::with_context(Arc::new(cli_context));
//!
//! // One value, prompted interactively or parsed from piped JSON.
//! let port = ScalarPrompt::new(PromptSpec::new("Port: ").default("8080").convert(convert::integer))
//!     .read(&resolver)?;
//!
//! // A stream of lines (one JSON array element per line in JSON mode).
//! let first_three = collect(LineStream::open(&resolver), Some(3));
//! ```
//!
//! # Architecture
//!
//! - [`ModeResolver`] decides, per operation, whether stdin is a JSON
//!   document or plain lines, and whether styling is permitted.
//! - [`ScalarPrompt`] reads a single value; [`LineStream`] (blocking)
//!   and [`AsyncLineStream`] (Tokio-cooperative) read line sequences
//!   with identical semantics.
//! - In JSON mode all entry points route through [`fan_out`]: a
//!   top-level array becomes one logical line per element, anything
//!   else exactly one line, and unparseable input degrades to plain
//!   lines.
//! - [`collect`] / [`collect_async`] bound either stream to "first N"
//!   or "all lines".
//!
//! Failures degrade rather than abort: parse and conversion errors fall
//! back to the raw input, read failures fall back to configured
//! defaults, and stream errors terminate the sequence after a log line.
//! The crate emits `tracing` events but never installs a subscriber.
//!
//! # Testing
//!
//! All I/O goes through injectable seams ([`StdinReader`], [`Prompter`],
//! [`TtyProbe`]) with mock implementations, so callers' tests never
//! depend on real terminal state:
//!
//! ```
//! use inlet::{LineStream, MockStdin, ModeResolver};
//! use std::sync::Arc;
//!
//! let stream = LineStream::with_reader(Arc::new(MockStdin::piped("a\nb")), &ModeResolver::new());
//! assert_eq!(stream.collect::<Vec<_>>(), vec!["a", "b"]);
//! ```

mod collect;
pub mod env;
mod error;
mod json;
mod mode;
mod nonblocking;
mod prompt;
mod prompter;
mod stream;

pub use collect::{collect, collect_async};
pub use error::InputError;
pub use json::fan_out;
pub use mode::{InputMode, ModeResolver, ResolvedMode, RunContext, StaticContext};
pub use nonblocking::AsyncLineStream;
pub use prompt::{convert, ConvertFn, PromptOutcome, PromptSpec, ScalarPrompt};
pub use prompter::{
    MockPrompter, PlainPrompter, PromptChannel, PromptStyle, Prompter, RichPrompter,
};
pub use stream::LineStream;

// Re-export environment seams for testing
pub use env::{MockStdin, MockTty, RealStdin, RealTty, StdinReader, TtyProbe};
