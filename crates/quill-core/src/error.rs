//! Buffer error type.

use std::io;

/// Errors produced by [`Buffer`](crate::Buffer) and [`Line`](crate::Line) operations.
///
/// Coordinates are never clamped silently: a row, column, or byte offset outside the
/// document fails with one of the out-of-range variants.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// The row does not exist (`len` is the current line count).
    #[error("row {row} out of range (buffer has {len} lines)")]
    RowOutOfRange {
        /// Requested row.
        row: usize,
        /// Number of lines in the buffer.
        len: usize,
    },
    /// The column is past the end of the line (`len` is the line length in runes).
    #[error("column {column} out of range on row {row} (line has {len} runes)")]
    ColumnOutOfRange {
        /// Row of the offending line.
        row: usize,
        /// Requested column.
        column: usize,
        /// Rune length of the line.
        len: usize,
    },
    /// A byte offset is past the end of the canonical document bytes.
    #[error("byte offset {offset} out of range (document has {len} bytes)")]
    OffsetOutOfRange {
        /// Requested byte offset.
        offset: usize,
        /// Byte length of the document.
        len: usize,
    },
    /// A byte offset points inside a multi-byte rune.
    #[error("byte offset {offset} is not on a rune boundary")]
    InvalidOffset {
        /// Requested byte offset.
        offset: usize,
    },
    /// The buffer has no file name to save to.
    #[error("buffer has no file path")]
    NoPath,
    /// Opening, reading, writing, renaming, or deleting the file failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl BufferError {
    /// Attach a row to an error produced by a [`Line`](crate::Line) operation.
    pub(crate) fn on_row(self, row: usize) -> Self {
        match self {
            Self::ColumnOutOfRange { column, len, .. } => {
                Self::ColumnOutOfRange { row, column, len }
            }
            other => other,
        }
    }
}

/// Result alias used throughout `quill-core`.
pub type Result<T, E = BufferError> = std::result::Result<T, E>;
