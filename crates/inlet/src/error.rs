//! Error types for console input.

use std::io;

/// Errors that can occur while reading console input.
///
/// Most failure modes in this crate are recovered locally (JSON parse
/// failures fall back to plain lines, converter failures fall back to the
/// unconverted text) and never reach the caller as errors. The variants
/// here cover the cases that do.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Failed to read from stdin.
    #[error("Failed to read stdin: {0}")]
    StdinFailed(#[source] io::Error),

    /// Stdin was closed before a value could be read.
    #[error("Input closed before a value was read.")]
    InputClosed,

    /// Interactive prompt failed.
    #[error("Prompt failed: {0}")]
    PromptFailed(String),
}
