//! A single line of text addressed in runes.
//!
//! [`Line`] stores exactly the UTF-8 bytes of one line, without its terminator. Every index
//! passed to a `Line` method is a **rune** index; the byte offset is derived internally, so a
//! `Line` can never be cut through the middle of a multi-byte character.
//!
//! Lines are values: the editing methods return a new `Line` and leave `self` untouched.

use crate::error::{BufferError, Result};
use std::fmt;

/// One line of a [`Buffer`](crate::Buffer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Line {
    text: String,
}

impl Line {
    /// Create an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line from text. The text must not contain `'\n'`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(!text.contains('\n'), "a Line never holds a newline");
        Self { text }
    }

    /// Line content as `&str`.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Line content as raw UTF-8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Length in runes.
    pub fn len(&self) -> usize {
        if self.text.is_ascii() {
            self.text.len()
        } else {
            self.text.chars().count()
        }
    }

    /// Length in bytes.
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the line has no content.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of rune column `col`. `col == len()` maps to `byte_len()`.
    pub fn byte_offset(&self, col: usize) -> Result<usize> {
        if self.text.is_ascii() {
            return if col <= self.text.len() {
                Ok(col)
            } else {
                Err(self.out_of_range(col))
            };
        }
        if col == 0 {
            return Ok(0);
        }
        match self.text.char_indices().nth(col) {
            Some((byte, _)) => Ok(byte),
            None if col == self.len() => Ok(self.text.len()),
            None => Err(self.out_of_range(col)),
        }
    }

    /// Rune column for a byte offset inside this line.
    ///
    /// Offsets that split a rune fail with [`BufferError::InvalidOffset`].
    pub fn column_of_byte(&self, byte: usize) -> Result<usize> {
        if byte > self.text.len() {
            return Err(BufferError::OffsetOutOfRange {
                offset: byte,
                len: self.text.len(),
            });
        }
        if !self.text.is_char_boundary(byte) {
            return Err(BufferError::InvalidOffset { offset: byte });
        }
        Ok(self.text[..byte].chars().count())
    }

    /// The rune at column `col`, if any.
    pub fn rune(&self, col: usize) -> Option<char> {
        self.text.chars().nth(col)
    }

    /// Runes `[start, end)` as a new line.
    pub fn slice(&self, start: usize, end: usize) -> Result<Line> {
        let (a, b) = self.byte_span(start, end)?;
        Ok(Line::from_text(&self.text[a..b]))
    }

    /// Runes `[start, end)` as `&str`.
    pub fn slice_str(&self, start: usize, end: usize) -> Result<&str> {
        let (a, b) = self.byte_span(start, end)?;
        Ok(&self.text[a..b])
    }

    /// A copy of this line with runes `[start, end)` removed.
    pub fn cut(&self, start: usize, end: usize) -> Result<Line> {
        self.replace(start, end, "")
    }

    /// A copy of this line with `text` inserted before rune `col`.
    pub fn insert(&self, col: usize, text: &str) -> Result<Line> {
        self.replace(col, col, text)
    }

    /// A copy of this line with runes `[start, end)` replaced by `text`.
    pub fn replace(&self, start: usize, end: usize, text: &str) -> Result<Line> {
        let (a, b) = self.byte_span(start, end)?;
        let mut out = String::with_capacity(self.text.len() - (b - a) + text.len());
        out.push_str(&self.text[..a]);
        out.push_str(text);
        out.push_str(&self.text[b..]);
        Ok(Line::from_text(out))
    }

    /// A copy of this line followed by `other`.
    pub fn append(&self, other: &Line) -> Line {
        let mut out = String::with_capacity(self.text.len() + other.text.len());
        out.push_str(&self.text);
        out.push_str(&other.text);
        Line::from_text(out)
    }

    /// Split into `[0, col)` and `[col, len)`.
    pub fn split_at(&self, col: usize) -> Result<(Line, Line)> {
        let at = self.byte_offset(col)?;
        let (head, tail) = self.text.split_at(at);
        Ok((Line::from_text(head), Line::from_text(tail)))
    }

    /// Number of leading whitespace runes (spaces and tabs).
    pub fn indent_len(&self) -> usize {
        self.text
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .count()
    }

    /// Returns `true` if the line is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn byte_span(&self, start: usize, end: usize) -> Result<(usize, usize)> {
        if start > end {
            return Err(self.out_of_range(start));
        }
        Ok((self.byte_offset(start)?, self.byte_offset(end)?))
    }

    fn out_of_range(&self, col: usize) -> BufferError {
        BufferError::ColumnOutOfRange {
            row: 0,
            column: col,
            len: self.len(),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rune_addressing() {
        let line = Line::from_text("a你b");
        assert_eq!(line.len(), 3);
        assert_eq!(line.byte_len(), 5);
        assert_eq!(line.byte_offset(1).unwrap(), 1);
        assert_eq!(line.byte_offset(2).unwrap(), 4);
        assert_eq!(line.byte_offset(3).unwrap(), 5);
        assert!(line.byte_offset(4).is_err());
    }

    #[test]
    fn test_edits_return_new_values() {
        let line = Line::from_text("héllo");
        let inserted = line.insert(2, "XY").unwrap();
        assert_eq!(inserted.as_str(), "héXYllo");
        assert_eq!(line.as_str(), "héllo");

        assert_eq!(line.cut(1, 3).unwrap().as_str(), "hlo");
        assert_eq!(line.replace(0, 2, "J").unwrap().as_str(), "Jllo");
        assert_eq!(line.slice(1, 4).unwrap().as_str(), "éll");
    }

    #[test]
    fn test_split_and_append() {
        let line = Line::from_text("😀ab");
        let (head, tail) = line.split_at(1).unwrap();
        assert_eq!(head.as_str(), "😀");
        assert_eq!(tail.as_str(), "ab");
        assert_eq!(head.append(&tail), line);
    }

    #[test]
    fn test_column_of_byte_rejects_partial_runes() {
        let line = Line::from_text("é!");
        assert_eq!(line.column_of_byte(2).unwrap(), 1);
        assert!(matches!(
            line.column_of_byte(1),
            Err(BufferError::InvalidOffset { offset: 1 })
        ));
    }

    #[test]
    fn test_reversed_span_is_rejected() {
        let line = Line::from_text("abc");
        assert!(line.cut(2, 1).is_err());
    }

    #[test]
    fn test_indent_len() {
        assert_eq!(Line::from_text("\t  x").indent_len(), 3);
        assert!(Line::from_text(" \t ").is_blank());
    }
}
