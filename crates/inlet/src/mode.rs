//! Input mode resolution.
//!
//! Callers of this crate run either interactively (a human at a terminal)
//! or under a scripting harness that feeds and expects structured JSON.
//! The [`ModeResolver`] decides which of the two applies for the current
//! operation, from a [`RunContext`] supplied by the surrounding CLI
//! framework. The context is always passed in explicitly; there is no
//! hidden process-global lookup.

use std::sync::Arc;

use crate::env::{RealTty, TtyProbe};

/// Capability interface for the ambient invocation context.
///
/// The surrounding CLI framework implements this for whatever carries its
/// per-invocation state. When no context is available, construct the
/// resolver with [`ModeResolver::new`] and both answers default to
/// `false`.
pub trait RunContext: Send + Sync {
    /// Whether output (and input interpretation) should be JSON-structured.
    fn json_output(&self) -> bool;

    /// Whether terminal styling is permitted.
    fn color_allowed(&self) -> bool;
}

/// How standard input is interpreted for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Line-by-line text from a human or a plain pipe.
    #[default]
    Interactive,
    /// The whole input is a single JSON document.
    JsonStructured,
}

impl InputMode {
    /// Returns true if input is interpreted as a JSON document.
    pub fn is_json(&self) -> bool {
        matches!(self, InputMode::JsonStructured)
    }
}

/// The outcome of one mode resolution.
///
/// Valid only for the operation it was resolved for; resolve again for
/// the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMode {
    /// How to interpret standard input.
    pub mode: InputMode,
    /// Whether prompt styling may be applied.
    pub use_color: bool,
}

/// Resolves the input mode and styling permission for one operation.
///
/// # Example
///
/// ```
/// use inlet::{ModeResolver, StaticContext, InputMode};
/// use std::sync::Arc;
///
/// let resolver = ModeResolver::with_context(Arc::new(StaticContext::new(true, false)));
/// assert_eq!(resolver.resolve().mode, InputMode::JsonStructured);
/// ```
#[derive(Clone)]
pub struct ModeResolver {
    context: Option<Arc<dyn RunContext>>,
    tty: Arc<dyn TtyProbe>,
}

impl ModeResolver {
    /// Create a resolver with no ambient context.
    ///
    /// Resolves to interactive mode with styling off.
    pub fn new() -> Self {
        Self {
            context: None,
            tty: Arc::new(RealTty),
        }
    }

    /// Create a resolver backed by the given context.
    pub fn with_context(context: Arc<dyn RunContext>) -> Self {
        Self {
            context: Some(context),
            tty: Arc::new(RealTty),
        }
    }

    /// Replace the terminal probe.
    ///
    /// This is primarily used for testing, where terminal attachment must
    /// not depend on how the test runner was invoked.
    pub fn with_tty(mut self, tty: Arc<dyn TtyProbe>) -> Self {
        self.tty = tty;
        self
    }

    /// Resolve the mode for the current operation.
    ///
    /// Styling additionally requires stdout to be attached to a terminal;
    /// a context that allows color has no effect on a piped stream. Safe
    /// to call repeatedly, but each result should only be trusted for the
    /// operation at hand.
    pub fn resolve(&self) -> ResolvedMode {
        let (json, color) = match &self.context {
            Some(ctx) => (ctx.json_output(), ctx.color_allowed()),
            None => (false, false),
        };

        ResolvedMode {
            mode: if json {
                InputMode::JsonStructured
            } else {
                InputMode::Interactive
            },
            use_color: color && self.tty.stdout_is_terminal(),
        }
    }
}

impl Default for ModeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`RunContext`] with fixed answers.
///
/// Useful for tests and for programs that settle both flags once at
/// startup (e.g. from `--json` and `--no-color` CLI flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticContext {
    json: bool,
    color: bool,
}

impl StaticContext {
    /// Create a context with the given flags.
    pub fn new(json: bool, color: bool) -> Self {
        Self { json, color }
    }
}

impl RunContext for StaticContext {
    fn json_output(&self) -> bool {
        self.json
    }

    fn color_allowed(&self) -> bool {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockTty;

    #[test]
    fn no_context_defaults_to_interactive_without_color() {
        let resolver = ModeResolver::new().with_tty(Arc::new(MockTty::attended()));
        let resolved = resolver.resolve();
        assert_eq!(resolved.mode, InputMode::Interactive);
        assert!(!resolved.use_color);
    }

    #[test]
    fn context_controls_json_mode() {
        let resolver = ModeResolver::with_context(Arc::new(StaticContext::new(true, false)))
            .with_tty(Arc::new(MockTty::detached()));
        assert_eq!(resolver.resolve().mode, InputMode::JsonStructured);
        assert!(resolver.resolve().mode.is_json());
    }

    #[test]
    fn color_requires_context_permission_and_terminal() {
        let allowed = StaticContext::new(false, true);

        let on_terminal = ModeResolver::with_context(Arc::new(allowed))
            .with_tty(Arc::new(MockTty::attended()));
        assert!(on_terminal.resolve().use_color);

        let piped = ModeResolver::with_context(Arc::new(allowed))
            .with_tty(Arc::new(MockTty::detached()));
        assert!(!piped.resolve().use_color);

        let denied = ModeResolver::with_context(Arc::new(StaticContext::new(false, false)))
            .with_tty(Arc::new(MockTty::attended()));
        assert!(!denied.resolve().use_color);
    }

    #[test]
    fn resolution_is_repeatable() {
        let resolver = ModeResolver::with_context(Arc::new(StaticContext::new(true, true)))
            .with_tty(Arc::new(MockTty::attended()));
        assert_eq!(resolver.resolve(), resolver.resolve());
    }
}
