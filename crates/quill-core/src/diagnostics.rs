//! First-class diagnostics data model.
//!
//! Diagnostics are derived document state: the syntax validator produces them, and so can
//! an external language server. Renderers use them for gutter markers, problem lists and
//! underlines. A list of diagnostics is always tied to the buffer version it was computed
//! for (see [`Versioned`](crate::Versioned)).

use crate::position::Range;

/// Priority of diagnostics reported by an external language server.
pub const LSP_DIAGNOSTIC_PRIORITY: i32 = 100;

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    Information,
    /// Hint diagnostics.
    Hint,
}

/// A single diagnostic item for the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Range the diagnostic covers.
    pub range: Range,
    /// Diagnostic severity.
    pub severity: DiagnosticSeverity,
    /// Optional diagnostic code (stringified).
    pub code: Option<String>,
    /// Optional diagnostic source (e.g. `"syntax"`, `"rust-analyzer"`).
    pub source: Option<String>,
    /// Diagnostic message.
    pub message: String,
    /// Display priority; when diagnostics overlap, the higher one wins.
    pub priority: i32,
}

impl Diagnostic {
    /// Create a diagnostic with no code or source and the language-server priority.
    pub fn new(range: Range, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            code: None,
            source: None,
            message: message.into(),
            priority: LSP_DIAGNOSTIC_PRIORITY,
        }
    }

    /// Set the source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Diagnostics touching `row`, highest priority first.
pub fn diagnostics_on_row(diagnostics: &[Diagnostic], row: usize) -> Vec<&Diagnostic> {
    let mut hits: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| d.range.spans_row(row))
        .collect();
    hits.sort_by(|a, b| b.priority.cmp(&a.priority));
    hits
}
