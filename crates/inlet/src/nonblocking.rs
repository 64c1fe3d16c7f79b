//! Cooperative (non-blocking) line stream.
//!
//! [`AsyncLineStream`] has the same contract as the blocking
//! [`LineStream`](crate::LineStream), but waiting for the next line
//! suspends only the calling task, never the runtime. In plain mode a
//! dedicated OS thread owns the stdin read and feeds a bounded channel;
//! in JSON mode the blocking read-to-end runs on the runtime's blocking
//! pool and the aggregated lines are handed back through the same
//! channel.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, warn};

use crate::env::{RealStdin, StdinReader};
use crate::json::fan_out;
use crate::mode::ModeResolver;

/// Whether some stream in this process currently owns real stdin.
static STDIN_ATTACHED: AtomicBool = AtomicBool::new(false);

/// A line stream that cooperates with the Tokio scheduler.
///
/// The input mode is resolved once at construction and fixed for the
/// stream's lifetime. Lines arrive in input order, each delivered
/// exactly once; the stream ends at end of input and never yields an
/// error (decode and I/O failures are logged once and terminate it).
///
/// Dropping the stream (including a consuming task cancelled while
/// awaiting [`next_line`](Self::next_line)) detaches the reader
/// cleanly: the producer observes the closed channel and stops, and
/// lines already delivered are never replayed. A reader thread blocked
/// in an in-flight stdin read lingers until that read returns, then
/// exits on its first failed delivery.
///
/// Stdin is a single process-wide resource. At most one stream should be
/// consuming it at a time; [`open`](Self::open) logs a warning when it
/// observes a second live attachment, but does not arbitrate between
/// them.
///
/// Both constructors must be called from within a Tokio runtime.
pub struct AsyncLineStream {
    rx: mpsc::Receiver<String>,
    owns_stdin: bool,
}

impl AsyncLineStream {
    /// Open a stream over the process's stdin.
    pub fn open(resolver: &ModeResolver) -> Self {
        if STDIN_ATTACHED.swap(true, Ordering::SeqCst) {
            warn!("stdin already has a live reader attached; lines will be split between streams");
        }
        let mut stream = Self::with_reader(Arc::new(RealStdin), resolver);
        stream.owns_stdin = true;
        stream
    }

    /// Open a stream over a custom reader.
    ///
    /// This is primarily used for testing to inject mock stdin.
    pub fn with_reader(reader: Arc<dyn StdinReader>, resolver: &ModeResolver) -> Self {
        let rx = if resolver.resolve().mode.is_json() {
            spawn_structured_feed(reader)
        } else {
            spawn_line_feed(reader)
        };
        Self {
            rx,
            owns_stdin: false,
        }
    }

    /// Wait for the next line, suspending only the calling task.
    ///
    /// Returns `None` once the stream has ended. Cancel-safe: dropping
    /// the returned future before completion loses no lines.
    pub async fn next_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl Stream for AsyncLineStream {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for AsyncLineStream {
    fn drop(&mut self) {
        if self.owns_stdin {
            STDIN_ATTACHED.store(false, Ordering::SeqCst);
        }
    }
}

/// Plain mode: a dedicated OS thread reads line by line.
///
/// The channel holds a single line, so the reader never runs more than
/// one line ahead of the consumer.
fn spawn_line_feed(reader: Arc<dyn StdinReader>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        debug!("line stream opened");
        let mut count: u64 = 0;
        loop {
            match reader.read_line() {
                Ok(Some(line)) => {
                    if tx.blocking_send(line).is_err() {
                        debug!(lines = count, "consumer dropped, detaching stdin reader");
                        break;
                    }
                    count += 1;
                }
                Ok(None) => {
                    debug!(lines = count, "stdin reached end of input");
                    break;
                }
                Err(error) => {
                    warn!(%error, lines = count, "stdin read failed, ending stream");
                    break;
                }
            }
        }
    });
    rx
}

/// JSON mode: slurp on the blocking pool, then feed the aggregated
/// logical lines.
fn spawn_structured_feed(reader: Arc<dyn StdinReader>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let captured = match task::spawn_blocking(move || reader.read_to_string()).await {
            Ok(Ok(captured)) => captured,
            Ok(Err(error)) => {
                warn!(%error, "failed to capture stdin, stream will be empty");
                String::new()
            }
            Err(error) => {
                warn!(%error, "stdin capture task failed, stream will be empty");
                String::new()
            }
        };
        let lines = fan_out(&captured);
        debug!(lines = lines.len(), "line stream opened in structured mode");
        for line in lines {
            if tx.send(line).await.is_err() {
                debug!("consumer dropped, discarding remaining lines");
                return;
            }
        }
    });
    rx
}
