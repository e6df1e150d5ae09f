use crate::highlight::{highlight, MatchMap};
use crate::tree::SyntaxTree;
use crate::validate::validate;
use quill_core::{Diagnostic, InlayHint, Versioned};

/// Highlights and syntax diagnostics computed for one buffer version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxUpdate {
    /// Buffer version the snapshot was taken at.
    pub version: u64,
    /// Highlight matches.
    pub matches: MatchMap,
    /// Syntax diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Validate and highlight `snapshot` concurrently.
///
/// Both passes read the same snapshot and run to completion; the result is tagged with
/// `version` so a late result can be rejected by [`DocumentAnnotations::apply_syntax`].
pub fn analyze(snapshot: &SyntaxTree, version: u64) -> SyntaxUpdate {
    let (matches, diagnostics) = std::thread::scope(|s| {
        let validation = s.spawn(|| validate(snapshot));
        let matches = highlight(snapshot);
        let diagnostics = validation
            .join()
            .unwrap_or_else(|p| std::panic::resume_unwind(p));
        (matches, diagnostics)
    });
    tracing::debug!(
        version,
        matches = matches.len(),
        diagnostics = diagnostics.len(),
        "analyzed syntax snapshot"
    );
    SyntaxUpdate {
        version,
        matches,
        diagnostics,
    }
}

/// Derived state of one document, each slot guarded by the buffer version it was
/// computed for.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnnotations {
    matches: Versioned<MatchMap>,
    syntax_diagnostics: Versioned<Vec<Diagnostic>>,
    lsp_diagnostics: Versioned<Vec<Diagnostic>>,
    inlay_hints: Versioned<Vec<InlayHint>>,
}

impl DocumentAnnotations {
    /// Empty annotations at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a syntax update unless it is older than the stored one. Returns `true` if stored.
    pub fn apply_syntax(&mut self, update: SyntaxUpdate) -> bool {
        let stored = self.matches.apply(update.version, update.matches);
        if stored {
            self.syntax_diagnostics.apply(update.version, update.diagnostics);
        }
        stored
    }

    /// Store diagnostics from a language server computed for `version`.
    pub fn apply_lsp_diagnostics(&mut self, version: u64, diagnostics: Vec<Diagnostic>) -> bool {
        self.lsp_diagnostics.apply(version, diagnostics)
    }

    /// Store inlay hints computed for `version`.
    pub fn apply_inlay_hints(&mut self, version: u64, hints: Vec<InlayHint>) -> bool {
        self.inlay_hints.apply(version, hints)
    }

    /// Current highlight matches.
    pub fn matches(&self) -> &Versioned<MatchMap> {
        &self.matches
    }

    /// Current syntax diagnostics.
    pub fn syntax_diagnostics(&self) -> &Versioned<Vec<Diagnostic>> {
        &self.syntax_diagnostics
    }

    /// Current language-server diagnostics.
    pub fn lsp_diagnostics(&self) -> &Versioned<Vec<Diagnostic>> {
        &self.lsp_diagnostics
    }

    /// Current inlay hints.
    pub fn inlay_hints(&self) -> &Versioned<Vec<InlayHint>> {
        &self.inlay_hints
    }

    /// Syntax and language-server diagnostics together, highest priority first.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<&Diagnostic> = self
            .syntax_diagnostics
            .get()
            .iter()
            .chain(self.lsp_diagnostics.get())
            .collect();
        all.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.range.start.cmp(&b.range.start))
        });
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{DiagnosticSeverity, Position, Range};

    fn update(version: u64, message: &str) -> SyntaxUpdate {
        SyntaxUpdate {
            version,
            matches: MatchMap::new(),
            diagnostics: vec![Diagnostic::new(
                Range::from_coords(0, 0, 0, 1),
                DiagnosticSeverity::Error,
                message,
            )
            .with_priority(crate::SYNTAX_ERROR_PRIORITY)],
        }
    }

    #[test]
    fn test_stale_syntax_update_is_dropped() {
        let mut annotations = DocumentAnnotations::new();
        assert!(annotations.apply_syntax(update(3, "three")));
        assert!(!annotations.apply_syntax(update(2, "two")));
        assert_eq!(annotations.syntax_diagnostics().version(), 3);
        assert_eq!(annotations.syntax_diagnostics().get()[0].message, "three");

        assert!(annotations.apply_syntax(update(5, "five")));
        assert_eq!(annotations.syntax_diagnostics().get().len(), 1);
        assert_eq!(annotations.matches().version(), 5);
    }

    #[test]
    fn test_slots_are_guarded_independently() {
        let mut annotations = DocumentAnnotations::new();
        annotations.apply_syntax(update(4, "syntax"));
        assert!(annotations.apply_lsp_diagnostics(
            2,
            vec![Diagnostic::new(
                Range::from_coords(1, 0, 1, 3),
                DiagnosticSeverity::Warning,
                "unused"
            )]
        ));
        let hint = InlayHint::new(Position::new(0, 1), ": i32");
        assert!(annotations.apply_inlay_hints(1, vec![hint]));
        assert!(!annotations.apply_inlay_hints(0, Vec::new()));

        let merged = annotations.diagnostics();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].message, "syntax");
        assert_eq!(merged[1].message, "unused");
        assert_eq!(annotations.inlay_hints().get().len(), 1);
    }
}
