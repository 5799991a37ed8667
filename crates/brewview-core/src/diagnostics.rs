//! Injected diagnostic reporting.
//!
//! Models report non-fatal misuse (a column index past the end, a row that no
//! longer exists, an unrecognised kind discriminant, an edit that could not be
//! converted) to a [`Diagnostics`] sink handed to them at construction. The
//! operation itself still returns its sentinel; the sink only makes the
//! condition visible.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use brewview_core::{Diagnostic, DiagnosticKind, Diagnostics, RecordingDiagnostics};
//!
//! let sink = Arc::new(RecordingDiagnostics::new());
//! sink.report(Diagnostic::new("FermentableTable::data", DiagnosticKind::BadColumn, "column 9"));
//! assert_eq!(sink.count_of(DiagnosticKind::BadColumn), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logging::targets;

/// Category of a reported condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A column index outside the model's columns.
    BadColumn,
    /// A row index outside the model's rows.
    BadRow,
    /// A raw discriminant that names no known kind.
    UnknownKind,
    /// An edit whose value could not be converted to the field's shape.
    Rejected,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadColumn => write!(f, "bad column"),
            Self::BadRow => write!(f, "bad row"),
            Self::UnknownKind => write!(f, "unknown kind"),
            Self::Rejected => write!(f, "rejected value"),
        }
    }
}

/// One reported condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The reporting operation, e.g. `"TreeItem::data_hop"`.
    pub source: &'static str,
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Free-form detail such as the offending index.
    pub detail: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(source: &'static str, kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            source,
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.source, self.kind, self.detail)
    }
}

/// A sink for diagnostics.
pub trait Diagnostics: Send + Sync {
    /// Reports a condition. Must not panic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing` as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            target: targets::DIAGNOSTICS,
            source = diagnostic.source,
            kind = %diagnostic.kind,
            "{}",
            diagnostic.detail
        );
    }
}

/// Keeps every diagnostic in memory, for assertions.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Number of reported diagnostics of the given kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }

    /// Returns `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Forgets all recorded diagnostics.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

/// The sink used when a caller does not inject one.
pub fn default_diagnostics() -> Arc<dyn Diagnostics> {
    Arc::new(TracingDiagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_diagnostics() {
        let sink = RecordingDiagnostics::new();
        assert!(sink.is_empty());

        sink.report(Diagnostic::new("a", DiagnosticKind::BadRow, "row 4"));
        sink.report(Diagnostic::new("b", DiagnosticKind::BadColumn, "column 7"));
        sink.report(Diagnostic::new("c", DiagnosticKind::BadColumn, "column 8"));

        assert_eq!(sink.count_of(DiagnosticKind::BadColumn), 2);
        assert_eq!(sink.entries()[0].detail, "row 4");

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new("TreeItem::data", DiagnosticKind::UnknownKind, "42");
        assert_eq!(d.to_string(), "TreeItem::data unknown kind: 42");
    }

    #[test]
    fn test_tracing_diagnostics_does_not_panic() {
        TracingDiagnostics.report(Diagnostic::new("x", DiagnosticKind::Rejected, "nope"));
    }
}
