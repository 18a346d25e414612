//! Diagnostic reporting for degrade-and-continue conditions.
//!
//! The translator never consults process-wide print toggles. Every component
//! that can warn receives a [`DiagnosticSink`] from its caller; verbose
//! per-instruction tracing goes through the `log` facade instead.

use std::fmt;

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Function skipped because it has no instructions.
    EmptyFunction,
    /// Function declared without any location.
    MissingSourceInfo,
    /// Function declared with an invalid source range.
    InvalidSourceInfo,
}

/// A single warning raised during translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Display name of the function being translated.
    pub function: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, function: impl Into<String>) -> Self {
        let function = function.into();
        let message = match kind {
            DiagnosticKind::EmptyFunction => format!("Function with empty body: {function}"),
            DiagnosticKind::MissingSourceInfo => {
                format!("Source information is null for function: {function}")
            }
            DiagnosticKind::InvalidSourceInfo => {
                format!("Source information is invalid for function: {function}")
            }
        };
        Self { kind, function, message }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WARNING: {}", self.message)
    }
}

/// Receiver for translation warnings.
pub trait DiagnosticSink {
    fn warn(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic.message);
    }
}

/// Keeps every diagnostic in arrival order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of collected diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&mut self, diagnostic: Diagnostic) {
        log::debug!("collected diagnostic: {}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }
}
