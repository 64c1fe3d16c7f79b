//! Blocking line stream.

use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::env::{RealStdin, StdinReader};
use crate::json::fan_out;
use crate::mode::ModeResolver;

enum Inner {
    Plain {
        reader: Arc<dyn StdinReader>,
        done: bool,
        count: u64,
    },
    Buffered(std::vec::IntoIter<String>),
}

/// A lazy, forward-only sequence of decoded lines from stdin.
///
/// The input mode is resolved once at construction and fixed for the
/// stream's lifetime. In plain mode each call to `next` reads one line,
/// with the terminator stripped, and nothing is read ahead. In JSON mode
/// construction blocks until end of input, parses the whole capture, and
/// the stream yields the resulting logical lines.
///
/// The sequence ends at end of input and never yields an error: decode
/// and I/O failures are logged once and terminate the stream. A stream
/// is not restartable; once exhausted it stays exhausted.
///
/// # Example
///
/// ```ignore
/// use inlet::{LineStream, ModeResolver};
///
/// for line in LineStream::open(&ModeResolver::new()) {
///     println!("got: {line}");
/// }
/// ```
pub struct LineStream {
    inner: Inner,
}

impl LineStream {
    /// Open a stream over the process's stdin.
    pub fn open(resolver: &ModeResolver) -> Self {
        Self::with_reader(Arc::new(RealStdin), resolver)
    }

    /// Open a stream over a custom reader.
    ///
    /// This is primarily used for testing to inject mock stdin.
    pub fn with_reader(reader: Arc<dyn StdinReader>, resolver: &ModeResolver) -> Self {
        if resolver.resolve().mode.is_json() {
            let captured = match reader.read_to_string() {
                Ok(captured) => captured,
                Err(error) => {
                    warn!(%error, "failed to capture stdin, stream will be empty");
                    String::new()
                }
            };
            let lines = fan_out(&captured);
            debug!(lines = lines.len(), "line stream opened in structured mode");
            Self {
                inner: Inner::Buffered(lines.into_iter()),
            }
        } else {
            debug!("line stream opened");
            Self {
                inner: Inner::Plain {
                    reader,
                    done: false,
                    count: 0,
                },
            }
        }
    }
}

impl Iterator for LineStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.inner {
            Inner::Buffered(lines) => lines.next(),
            Inner::Plain {
                reader,
                done,
                count,
            } => {
                if *done {
                    return None;
                }
                match reader.read_line() {
                    Ok(Some(line)) => {
                        *count += 1;
                        Some(line)
                    }
                    Ok(None) => {
                        *done = true;
                        debug!(lines = *count, "stdin reached end of input");
                        None
                    }
                    Err(error) => {
                        *done = true;
                        warn!(%error, lines = *count, "stdin read failed, ending stream");
                        None
                    }
                }
            }
        }
    }
}

impl FusedIterator for LineStream {}
