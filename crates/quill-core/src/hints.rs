//! Inlay hints supplied by an external language server.

use crate::position::Position;

/// A label rendered inline at a position (parameter names, inferred types).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlayHint {
    /// Where the hint is rendered.
    pub position: Position,
    /// Text of the hint.
    pub label: String,
    /// Render a space before the label.
    pub padding_left: bool,
    /// Render a space after the label.
    pub padding_right: bool,
}

impl InlayHint {
    /// Create a hint without padding.
    pub fn new(position: Position, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
            padding_left: false,
            padding_right: false,
        }
    }

    /// Label with padding applied.
    pub fn display_label(&self) -> String {
        let mut out = String::with_capacity(self.label.len() + 2);
        if self.padding_left {
            out.push(' ');
        }
        out.push_str(&self.label);
        if self.padding_right {
            out.push(' ');
        }
        out
    }
}

/// Hints on `row`, in column order.
pub fn hints_on_row(hints: &[InlayHint], row: usize) -> Vec<&InlayHint> {
    let mut hits: Vec<&InlayHint> = hints.iter().filter(|h| h.position.row == row).collect();
    hits.sort_by_key(|h| h.position.col);
    hits
}
