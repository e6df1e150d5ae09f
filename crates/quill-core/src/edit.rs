//! Byte-range edit descriptors.
//!
//! Incremental consumers (the syntax tree engine, indexers) need to know which bytes of the
//! canonical document changed, together with the row/byte-column points of the edit
//! boundaries. Buffer mutations only return cursors, so the caller brackets an edit:
//!
//! ```rust
//! use quill_core::{Buffer, Position};
//!
//! let mut buffer = Buffer::from_text("scratch", "let a = 1;");
//! let start = Position::new(0, 4);
//! let end = Position::new(0, 5);
//!
//! let pending = buffer.begin_edit(start, end).unwrap();
//! let cursor = buffer.replace(0, 4, 0, 5, "abc").unwrap();
//! let edit = pending.finish(&buffer, cursor).unwrap();
//!
//! assert_eq!((edit.start_byte, edit.old_end_byte, edit.new_end_byte), (4, 5, 7));
//! ```

use crate::buffer::Buffer;
use crate::error::Result;
use crate::position::Position;

/// A `(row, byte column)` point, the coordinate system parsers work in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    /// Zero-based line index.
    pub row: usize,
    /// Zero-based byte offset within the line.
    pub column: usize,
}

impl Point {
    /// Create a new point.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// A single edit over the canonical (LF-joined) document bytes.
///
/// Semantics: bytes `[start_byte, old_end_byte)` of the old document were replaced by bytes
/// `[start_byte, new_end_byte)` of the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteEdit {
    /// Start of the edit, in both documents.
    pub start_byte: usize,
    /// End of the replaced range in the old document.
    pub old_end_byte: usize,
    /// End of the inserted range in the new document.
    pub new_end_byte: usize,
    /// Point of `start_byte`.
    pub start_point: Point,
    /// Point of `old_end_byte` in the old document.
    pub old_end_point: Point,
    /// Point of `new_end_byte` in the new document.
    pub new_end_point: Point,
}

impl ByteEdit {
    /// Returns `true` if the edit neither removed nor inserted anything.
    pub fn is_noop(&self) -> bool {
        self.start_byte == self.old_end_byte && self.start_byte == self.new_end_byte
    }
}

/// The "before" half of a [`ByteEdit`], captured prior to mutating the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEdit {
    start_byte: usize,
    old_end_byte: usize,
    start_point: Point,
    old_end_point: Point,
}

impl PendingEdit {
    /// Complete the edit once the buffer has been mutated; `new_end` is the cursor the
    /// mutation returned.
    pub fn finish(self, buffer: &Buffer, new_end: Position) -> Result<ByteEdit> {
        Ok(ByteEdit {
            start_byte: self.start_byte,
            old_end_byte: self.old_end_byte,
            new_end_byte: buffer.byte_index(new_end.row, new_end.col)?,
            start_point: self.start_point,
            old_end_point: self.old_end_point,
            new_end_point: buffer.point(new_end)?,
        })
    }
}

impl Buffer {
    /// Capture the byte offsets and points of `[start, old_end)` before an edit.
    pub fn begin_edit(&self, start: Position, old_end: Position) -> Result<PendingEdit> {
        let (start, old_end) = if old_end < start {
            (old_end, start)
        } else {
            (start, old_end)
        };
        Ok(PendingEdit {
            start_byte: self.byte_index(start.row, start.col)?,
            old_end_byte: self.byte_index(old_end.row, old_end.col)?,
            start_point: self.point(start)?,
            old_end_point: self.point(old_end)?,
        })
    }
}
