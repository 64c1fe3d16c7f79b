//! Scalar prompt reading.
//!
//! A [`ScalarPrompt`] reads exactly one value from stdin per call. The
//! mode is resolved once at the start of each read: interactively the
//! prompt renders to stdout and the typed line is returned (optionally
//! masked, defaulted, and converted); in JSON mode the prompt renders to
//! stderr, the line is parsed as JSON, and the result can be wrapped
//! under an output key so stdout-bound results stay machine-readable.
//!
//! Failures lean toward producing a value rather than an error: JSON
//! parse failures fall back to the plain string, converter failures fall
//! back to the unconverted input, and read failures fall back to the
//! configured default with the error carried alongside for visibility.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::task;
use tracing::{debug, warn};

use crate::error::InputError;
use crate::mode::ModeResolver;
use crate::prompter::{PromptChannel, PromptStyle, Prompter, RichPrompter};

/// Converter from raw input text to a typed value.
///
/// Returning `Err` is not fatal: the unconverted input is used instead.
pub type ConvertFn = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Configuration for one scalar read.
///
/// # Example
///
/// ```
/// use inlet::{convert, PromptSpec};
///
/// let spec = PromptSpec::new("Port: ")
///     .default("8080")
///     .convert(convert::integer)
///     .json_key("port")
///     .color("cyan")
///     .bold();
/// ```
#[derive(Clone)]
pub struct PromptSpec {
    text: String,
    mask: bool,
    default: Option<String>,
    convert: Option<ConvertFn>,
    json_key: Option<String>,
    style: PromptStyle,
}

impl PromptSpec {
    /// Create a spec with the given prompt text (may be empty).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mask: false,
            default: None,
            convert: None,
            json_key: None,
            style: PromptStyle::default(),
        }
    }

    /// Hide characters while the user types (secrets).
    pub fn mask(mut self) -> Self {
        self.mask = true;
        self
    }

    /// Value to use when input is empty or the read fails.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Convert the raw input text to a typed value.
    ///
    /// Conversion failures are swallowed: the unconverted input is
    /// returned instead.
    pub fn convert<F>(mut self, convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.convert = Some(Arc::new(convert));
        self
    }

    /// Wrap JSON-mode results as `{key: value}` instead of the bare
    /// value.
    pub fn json_key(mut self, key: impl Into<String>) -> Self {
        self.json_key = Some(key.into());
        self
    }

    /// Advisory prompt color by name ("red", "cyan", ...).
    pub fn color(mut self, name: impl Into<String>) -> Self {
        self.style.color = Some(name.into());
        self
    }

    /// Render the prompt bold (advisory).
    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }
}

impl fmt::Debug for PromptSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptSpec")
            .field("text", &self.text)
            .field("mask", &self.mask)
            .field("default", &self.default)
            .field("has_converter", &self.convert.is_some())
            .field("json_key", &self.json_key)
            .field("style", &self.style)
            .finish()
    }
}

/// The result of one scalar read.
///
/// `error` is set when the read failed and a substitute value (the
/// configured default, or a structured failure) was returned in its
/// place. In JSON mode the same message is also embedded in the value
/// itself so serialized output carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptOutcome {
    /// The resolved value.
    pub value: Value,
    /// The read failure, when the value is a substitute.
    pub error: Option<String>,
}

/// Reads one value from stdin per call.
pub struct ScalarPrompt {
    spec: PromptSpec,
    prompter: Arc<dyn Prompter>,
}

impl Clone for ScalarPrompt {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            prompter: Arc::clone(&self.prompter),
        }
    }
}

impl ScalarPrompt {
    /// Create a prompt using the rich (console-styled) prompter.
    pub fn new(spec: PromptSpec) -> Self {
        Self::with_prompter(spec, Arc::new(RichPrompter))
    }

    /// Create a prompt with a custom prompter.
    ///
    /// Use [`PlainPrompter`](crate::PlainPrompter) when terminal styling
    /// is unwanted, or [`MockPrompter`](crate::MockPrompter) in tests.
    pub fn with_prompter(spec: PromptSpec, prompter: Arc<dyn Prompter>) -> Self {
        Self { spec, prompter }
    }

    /// Read one value, blocking the calling thread.
    ///
    /// The mode is resolved once at the start of the call and fixed for
    /// its duration. The JSON path never returns `Err`; interactively an
    /// error is returned only for a read failure with no default
    /// configured.
    pub fn read(&self, resolver: &ModeResolver) -> Result<PromptOutcome, InputError> {
        let resolved = resolver.resolve();
        if resolved.mode.is_json() {
            Ok(self.read_json())
        } else {
            self.read_interactive(resolved.use_color)
        }
    }

    /// Read one value from cooperative code.
    ///
    /// The blocking read (possibly waiting on a human) is dispatched to
    /// the runtime's blocking pool so it cannot stall other scheduled
    /// tasks.
    pub async fn read_async(&self, resolver: &ModeResolver) -> Result<PromptOutcome, InputError> {
        let prompt = self.clone();
        let resolver = resolver.clone();
        task::spawn_blocking(move || prompt.read(&resolver))
            .await
            .map_err(|e| InputError::PromptFailed(e.to_string()))?
    }

    fn read_json(&self) -> PromptOutcome {
        if !self.spec.text.is_empty() {
            // Stderr keeps stdout machine-readable.
            if let Err(error) =
                self.prompter
                    .show(&self.spec.text, &self.spec.style, false, PromptChannel::Stderr)
            {
                debug!(%error, "prompt render failed");
            }
        }

        match self.prompter.read_line() {
            Ok(Some(raw)) => PromptOutcome {
                value: self.wrap(self.interpret(&raw), None),
                error: None,
            },
            Ok(None) => self.json_failure("input closed before a value was read"),
            Err(error) => self.json_failure(&error.to_string()),
        }
    }

    fn read_interactive(&self, use_color: bool) -> Result<PromptOutcome, InputError> {
        if !self.spec.text.is_empty() {
            if let Err(error) = self.prompter.show(
                &self.spec.text,
                &self.spec.style,
                use_color,
                PromptChannel::Stdout,
            ) {
                debug!(%error, "prompt render failed");
            }
        }

        let read = if self.spec.mask {
            self.prompter.read_masked()
        } else {
            self.prompter.read_line()
        };

        match read {
            Ok(Some(raw)) => {
                let raw = if raw.is_empty() {
                    self.spec.default.clone().unwrap_or_default()
                } else {
                    raw
                };
                Ok(PromptOutcome {
                    value: self.convert_or_text(&raw),
                    error: None,
                })
            }
            Ok(None) => self.interactive_failure(InputError::InputClosed),
            Err(error) => self.interactive_failure(InputError::StdinFailed(error)),
        }
    }

    /// JSON-parse the raw line, falling back to a plain string, then let
    /// the converter override when it succeeds.
    fn interpret(&self, raw: &str) -> Value {
        let parsed = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        match &self.spec.convert {
            Some(convert) => convert(raw).unwrap_or_else(|error| {
                debug!(%error, "conversion failed, keeping unconverted value");
                parsed
            }),
            None => parsed,
        }
    }

    fn convert_or_text(&self, raw: &str) -> Value {
        match &self.spec.convert {
            Some(convert) => convert(raw).unwrap_or_else(|error| {
                debug!(%error, "conversion failed, returning raw input");
                Value::String(raw.to_string())
            }),
            None => Value::String(raw.to_string()),
        }
    }

    fn wrap(&self, value: Value, error: Option<&str>) -> Value {
        match &self.spec.json_key {
            Some(key) => {
                let mut map = Map::new();
                map.insert(key.clone(), value);
                if let Some(error) = error {
                    map.insert("error".to_string(), Value::String(error.to_string()));
                }
                Value::Object(map)
            }
            None => value,
        }
    }

    /// JSON mode must always produce a well-formed value, so failures
    /// are embedded rather than returned as `Err`.
    fn json_failure(&self, message: &str) -> PromptOutcome {
        warn!(error = message, "prompt read failed");
        match &self.spec.default {
            Some(default) => PromptOutcome {
                value: self.wrap(self.interpret(default), Some(message)),
                error: Some(message.to_string()),
            },
            None => {
                let mut map = Map::new();
                if let Some(key) = &self.spec.json_key {
                    map.insert(key.clone(), Value::Null);
                }
                map.insert("error".to_string(), Value::String(message.to_string()));
                PromptOutcome {
                    value: Value::Object(map),
                    error: Some(message.to_string()),
                }
            }
        }
    }

    fn interactive_failure(&self, error: InputError) -> Result<PromptOutcome, InputError> {
        warn!(%error, "prompt read failed");
        match &self.spec.default {
            Some(default) => Ok(PromptOutcome {
                value: self.convert_or_text(default),
                error: Some(error.to_string()),
            }),
            None => Err(error),
        }
    }
}

/// Stock converters for common scalar types.
pub mod convert {
    use serde_json::Value;

    /// Parse the input as an integer.
    pub fn integer(raw: &str) -> Result<Value, String> {
        raw.trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| e.to_string())
    }

    /// Parse the input as a float.
    pub fn float(raw: &str) -> Result<Value, String> {
        raw.trim()
            .parse::<f64>()
            .map(Value::from)
            .map_err(|e| e.to_string())
    }

    /// Parse the input as a boolean (y/yes/true/1, n/no/false/0).
    pub fn boolean(raw: &str) -> Result<Value, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Ok(Value::Bool(true)),
            "n" | "no" | "false" | "0" => Ok(Value::Bool(false)),
            other => Err(format!("not a boolean: {other:?}")),
        }
    }
}
