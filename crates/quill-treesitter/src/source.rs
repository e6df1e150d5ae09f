use quill_core::{Buffer, Position};

/// The canonical document text a tree was parsed from.
///
/// Shared (behind an `Arc`) by a tree and all of its sub-trees, so node byte offsets can be
/// turned into rune [`Position`]s after the buffer has moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceText {
    /// Index `text` (expected to be LF-joined).
    pub fn new(text: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// Snapshot a buffer's canonical text.
    pub fn from_buffer(buffer: &Buffer) -> Self {
        Self::new(buffer.string())
    }

    /// The text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The text as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Convert a Tree-sitter `(row, byte column)` point to a rune position.
    pub fn position(&self, point: tree_sitter::Point) -> Position {
        let Some(&start) = self.line_starts.get(point.row) else {
            return self.end_position();
        };
        let col = self
            .text
            .get(start..start + point.column)
            .map(|s| s.chars().count())
            .unwrap_or(point.column);
        Position::new(point.row, col)
    }

    /// Convert a byte offset to a rune position (clamped to the end of the text).
    pub fn position_of_byte(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        self.position(tree_sitter::Point::new(row, offset - self.line_starts[row]))
    }

    /// Byte offset of a rune position, if it lies inside the text.
    pub fn byte_of(&self, position: Position) -> Option<usize> {
        let start = *self.line_starts.get(position.row)?;
        let end = self
            .line_starts
            .get(position.row + 1)
            .map_or(self.text.len(), |next| next - 1);
        let line = &self.text[start..end];
        if position.col == 0 {
            return Some(start);
        }
        line.char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .nth(position.col)
            .map(|i| start + i)
    }

    fn end_position(&self) -> Position {
        self.position_of_byte(self.text.len())
    }
}
