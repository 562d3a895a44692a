//! Explicit logging context handed to each component instance.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{Level, Span};

use crate::errors::{ErrorInfo, FunmanError};

/// Caller-controlled verbosity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Lifecycle messages.
    Info,
    /// Per-operation diagnostics.
    Debug,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// The most verbose tracing level admitted by this threshold.
    pub fn level(self) -> Level {
        match self {
            Verbosity::Error => Level::ERROR,
            Verbosity::Warn => Level::WARN,
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Trace => Level::TRACE,
        }
    }

    /// Whether a message at `level` passes the threshold.
    pub fn admits(self, level: Level) -> bool {
        level <= self.level()
    }
}

/// Span plus verbosity owned by a component (aggregator, dispatcher, ...).
///
/// Messages are emitted under the component's span so that a subscriber can
/// attribute them to one request without any process-wide logger state.
#[derive(Debug, Clone)]
pub struct LogContext {
    span: Span,
    verbosity: Verbosity,
}

impl LogContext {
    /// Creates a root context for a component.
    pub fn new(component: &'static str, verbosity: Verbosity) -> Self {
        Self {
            span: tracing::info_span!("funman", component = component),
            verbosity,
        }
    }

    /// Creates a root context tagged with a request identifier.
    pub fn for_request(component: &'static str, id: &str, verbosity: Verbosity) -> Self {
        Self {
            span: tracing::info_span!("funman", component = component, id = %id),
            verbosity,
        }
    }

    /// Derives a context for a sub-component, nested under this one.
    pub fn child(&self, component: &'static str) -> Self {
        Self {
            span: tracing::info_span!(parent: &self.span, "funman", component = component),
            verbosity: self.verbosity,
        }
    }

    /// Active verbosity threshold.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        self.verbosity.admits(level)
    }

    /// Runs `f` inside the span, so value types logging from within it are
    /// attributed to this component.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.span.in_scope(f)
    }

    /// Emits an error message.
    pub fn error(&self, message: impl Display) {
        if self.enabled(Level::ERROR) {
            tracing::error!(parent: &self.span, "{message}");
        }
    }

    /// Emits a warning.
    pub fn warn(&self, message: impl Display) {
        if self.enabled(Level::WARN) {
            tracing::warn!(parent: &self.span, "{message}");
        }
    }

    /// Emits a lifecycle message.
    pub fn info(&self, message: impl Display) {
        if self.enabled(Level::INFO) {
            tracing::info!(parent: &self.span, "{message}");
        }
    }

    /// Emits a diagnostic message.
    pub fn debug(&self, message: impl Display) {
        if self.enabled(Level::DEBUG) {
            tracing::debug!(parent: &self.span, "{message}");
        }
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new("funman", Verbosity::default())
    }
}

/// Installs a compact `tracing` subscriber for hosts and tests.
///
/// Fails when a global subscriber is already set.
pub fn install_subscriber(verbosity: Verbosity) -> Result<(), FunmanError> {
    tracing_subscriber::fmt()
        .with_max_level(verbosity.level())
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| FunmanError::Config(ErrorInfo::new("logging-init", err.to_string())))
}
