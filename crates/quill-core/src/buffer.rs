//! The line-oriented text buffer.
//!
//! A [`Buffer`] is an ordered list of [`Line`]s plus file metadata. All text mutation goes
//! through it, and every mutation:
//!
//! 1. returns the new cursor [`Position`],
//! 2. increments [`Buffer::version`],
//! 3. recomputes the content checksum and with it [`Buffer::dirty`].
//!
//! # Coordinates
//!
//! Rows index lines and columns index runes. The *canonical byte form* of a buffer is its
//! lines joined with `'\n'`, whatever the configured [`LineEnding`]; [`Buffer::byte_index`]
//! and [`Buffer::index`] convert between the two. The configured line ending and encoding
//! are applied only on [`Buffer::save`] and [`Buffer::bytes_for_display`].
//!
//! # Concurrency
//!
//! A buffer has a single writer. Mutating methods take `&mut self` and do no internal
//! locking; the owning event loop serializes access.

use crate::encoding;
use crate::error::{BufferError, Result};
use crate::line::Line;
use crate::line_ending::LineEnding;
use crate::position::{Position, Range};
use crate::text::split_lines;
use crate::edit::Point;
use encoding_rs::Encoding;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

type Checksum = [u8; 32];

/// An editable document.
#[derive(Debug, Clone)]
pub struct Buffer {
    path: PathBuf,
    lines: Vec<Line>,
    encoding: &'static Encoding,
    line_ending: LineEnding,
    version: u64,
    checksum: Checksum,
    saved_checksum: Option<Checksum>,
    on_disk: bool,
    dirty: bool,
}

impl Buffer {
    /// Create an empty, in-memory buffer for a new file at `path`.
    ///
    /// The buffer holds one empty line and is dirty until saved.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_lines(path.into(), vec![Line::new()], encoding_rs::UTF_8, LineEnding::Auto)
    }

    /// Create an in-memory buffer from UTF-8 text (not marked as on disk).
    ///
    /// `'\r\n'` terminators are stripped and decide the line ending, as on load.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let line_ending = LineEnding::detect(text.as_bytes());
        Self::with_lines(path.into(), split_lines(text), encoding_rs::UTF_8, line_ending)
    }

    /// Read a byte stream through `encoding` (a label such as `"utf-8"` or `"latin1"`;
    /// unknown labels fall back to UTF-8).
    ///
    /// [`LineEnding::Auto`] is resolved from the first terminated line.
    pub fn from_reader<R: Read>(
        path: impl Into<PathBuf>,
        mut reader: R,
        encoding: &str,
        line_ending: LineEnding,
    ) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(path.into(), &bytes, encoding, line_ending))
    }

    /// Open the file at `path`.
    ///
    /// A missing file yields an empty in-memory buffer (`on_disk == false`); any other I/O
    /// failure is returned.
    pub fn open(path: impl AsRef<Path>, encoding: &str, line_ending: LineEnding) -> Result<Self> {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(bytes) => {
                let mut buffer =
                    Self::from_bytes(path.to_path_buf(), &bytes, encoding, line_ending);
                buffer.on_disk = true;
                buffer.saved_checksum = Some(buffer.checksum);
                buffer.dirty = false;
                tracing::debug!(
                    path = %path.display(),
                    lines = buffer.lines.len(),
                    encoding = buffer.encoding.name(),
                    line_ending = ?buffer.line_ending,
                    "opened buffer"
                );
                Ok(buffer)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "new file");
                let mut buffer = Self::new(path);
                buffer.encoding = encoding::resolve(encoding);
                buffer.line_ending = line_ending;
                Ok(buffer)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn from_bytes(path: PathBuf, bytes: &[u8], encoding: &str, line_ending: LineEnding) -> Self {
        let encoding = encoding::resolve(encoding);
        let text = encoding::decode(encoding, bytes);
        let line_ending = line_ending.resolve(text.as_bytes());
        Self::with_lines(path, split_lines(&text), encoding, line_ending)
    }

    fn with_lines(
        path: PathBuf,
        lines: Vec<Line>,
        encoding: &'static Encoding,
        line_ending: LineEnding,
    ) -> Self {
        let lines = if lines.is_empty() { vec![Line::new()] } else { lines };
        let checksum = checksum_of(&lines);
        Self {
            path,
            lines,
            encoding,
            line_ending,
            version: 0,
            checksum,
            saved_checksum: None,
            on_disk: false,
            dirty: true,
        }
    }

    // ---------------------------------------------------------------------
    // Metadata
    // ---------------------------------------------------------------------

    /// Path the buffer saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name: the final path component, or the whole path if it has none.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Encoding used for reading and saving.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Change the save encoding (unknown labels fall back to UTF-8).
    pub fn set_encoding(&mut self, label: &str) {
        self.encoding = encoding::resolve(label);
    }

    /// Line ending used for saving.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Change the line ending used for saving.
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Monotonic content version, incremented on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the buffer has been loaded from or saved to disk.
    pub fn on_disk(&self) -> bool {
        self.on_disk
    }

    /// Whether the content differs from what was last saved.
    ///
    /// Always `true` for a buffer that only exists in memory.
    pub fn dirty(&self) -> bool {
        !self.on_disk || self.dirty
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    /// All lines. Never empty.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line `row`, if it exists.
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Rune length of line `row`, if it exists.
    pub fn line_len(&self, row: usize) -> Option<usize> {
        self.lines.get(row).map(Line::len)
    }

    /// Number of lines (always at least 1).
    pub fn lines_len(&self) -> usize {
        self.lines.len()
    }

    /// Byte length of the canonical form.
    pub fn bytes_len(&self) -> usize {
        self.lines.iter().map(Line::byte_len).sum::<usize>() + self.lines.len() - 1
    }

    /// Canonical bytes: lines joined with `'\n'`.
    pub fn bytes(&self) -> Vec<u8> {
        self.string().into_bytes()
    }

    /// Canonical text: lines joined with `'\n'`.
    pub fn string(&self) -> String {
        self.join("\n")
    }

    /// Text joined with the configured line ending (not re-encoded).
    pub fn bytes_for_display(&self) -> Vec<u8> {
        self.join(self.line_ending.as_str()).into_bytes()
    }

    /// Canonical bytes between two positions.
    pub fn bytes_range(&self, start: Position, end: Position) -> Result<Vec<u8>> {
        self.text_range(start, end).map(String::into_bytes)
    }

    /// Canonical text between two positions (reversed positions are swapped).
    pub fn text_range(&self, start: Position, end: Position) -> Result<String> {
        let (start, end) = ordered(start, end);
        self.check_position(start)?;
        self.check_position(end)?;
        if start.row == end.row {
            let line = &self.lines[start.row];
            return Ok(line
                .slice_str(start.col, end.col)
                .map_err(|e| e.on_row(start.row))?
                .to_string());
        }

        let first = &self.lines[start.row];
        let last = &self.lines[end.row];
        let mut out = String::new();
        out.push_str(first.slice_str(start.col, first.len()).map_err(|e| e.on_row(start.row))?);
        for line in &self.lines[start.row + 1..end.row] {
            out.push('\n');
            out.push_str(line.as_str());
        }
        out.push('\n');
        out.push_str(last.slice_str(0, end.col).map_err(|e| e.on_row(end.row))?);
        Ok(out)
    }

    fn join(&self, separator: &str) -> String {
        let mut out = String::with_capacity(self.bytes_len() + self.lines.len());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(line.as_str());
        }
        out
    }

    // ---------------------------------------------------------------------
    // Coordinate conversion
    // ---------------------------------------------------------------------

    /// Byte offset of `(row, col)` in the canonical form.
    pub fn byte_index(&self, row: usize, col: usize) -> Result<usize> {
        let line = self.line_at(row)?;
        let prefix: usize = self.lines[..row].iter().map(|l| l.byte_len() + 1).sum();
        let within = line.byte_offset(col).map_err(|e| e.on_row(row))?;
        Ok(prefix + within)
    }

    /// Position of a canonical byte offset. The offset of a `'\n'` maps to the end of its line.
    pub fn index(&self, offset: usize) -> Result<Position> {
        let len = self.bytes_len();
        if offset > len {
            return Err(BufferError::OffsetOutOfRange { offset, len });
        }
        let mut start = 0;
        for (row, line) in self.lines.iter().enumerate() {
            let end = start + line.byte_len();
            if offset <= end {
                let col = line.column_of_byte(offset - start).map_err(|e| match e {
                    BufferError::InvalidOffset { .. } => BufferError::InvalidOffset { offset },
                    other => other,
                })?;
                return Ok(Position::new(row, col));
            }
            start = end + 1;
        }
        Err(BufferError::OffsetOutOfRange { offset, len })
    }

    /// `(row, byte column)` point of a position.
    pub fn point(&self, position: Position) -> Result<Point> {
        let line = self.line_at(position.row)?;
        let column = line
            .byte_offset(position.col)
            .map_err(|e| e.on_row(position.row))?;
        Ok(Point::new(position.row, column))
    }

    /// Byte offset at which each line starts in the canonical form.
    pub fn line_starts(&self) -> Vec<usize> {
        let mut starts = Vec::with_capacity(self.lines.len());
        let mut offset = 0;
        for line in &self.lines {
            starts.push(offset);
            offset += line.byte_len() + 1;
        }
        starts
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Insert `text` at `(row, col)`; embedded `'\n'` create new lines.
    ///
    /// `text` is expected to be sanitized already (see [`crate::sanitize`]).
    pub fn insert(&mut self, row: usize, col: usize, text: &str) -> Result<Position> {
        let cursor = self.insert_raw(Position::new(row, col), text)?;
        self.touched();
        Ok(cursor)
    }

    /// Split line `row` at `col`.
    pub fn insert_new_line(&mut self, row: usize, col: usize) -> Result<Position> {
        self.insert(row, col, "\n")
    }

    /// Replace `[from, to)` with `text`.
    pub fn replace(
        &mut self,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
        text: &str,
    ) -> Result<Position> {
        let from = Position::new(from_row, from_col);
        let to = Position::new(to_row, to_col);
        self.check_position(from)?;
        self.check_position(to)?;
        let at = self.delete_range_raw(from, to)?;
        let cursor = self.insert_raw(at, text)?;
        self.touched();
        Ok(cursor)
    }

    /// Delete `[start, end)`.
    pub fn delete_range(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<Position> {
        let start = Position::new(start_row, start_col);
        let cursor = self.delete_range_raw(start, Position::new(end_row, end_col))?;
        self.touched();
        Ok(cursor)
    }

    /// Backspace `count` runes before `(row, col)`, joining lines across boundaries.
    ///
    /// At the start of the document this is a no-op (the version is not bumped).
    pub fn delete_before(&mut self, row: usize, col: usize, count: usize) -> Result<Position> {
        let end = Position::new(row, col);
        self.check_position(end)?;

        let (mut r, mut c) = (row, col);
        let mut remaining = count;
        while remaining > 0 {
            if c >= remaining {
                c -= remaining;
                remaining = 0;
            } else if r > 0 {
                remaining -= c + 1;
                r -= 1;
                c = self.lines[r].len();
            } else {
                c = 0;
                break;
            }
        }

        let start = Position::new(r, c);
        if start == end {
            return Ok(end);
        }
        let cursor = self.delete_range_raw(start, end)?;
        self.touched();
        Ok(cursor)
    }

    /// Delete `count` runes after `(row, col)`, joining lines across boundaries.
    ///
    /// At the end of the document this is a no-op (the version is not bumped).
    pub fn delete_after(&mut self, row: usize, col: usize, count: usize) -> Result<Position> {
        let start = Position::new(row, col);
        self.check_position(start)?;

        let (mut r, mut c) = (row, col);
        let mut remaining = count;
        while remaining > 0 {
            let available = self.lines[r].len() - c;
            if available >= remaining {
                c += remaining;
                remaining = 0;
            } else if r + 1 < self.lines.len() {
                remaining -= available + 1;
                r += 1;
                c = 0;
            } else {
                c = self.lines[r].len();
                break;
            }
        }

        let end = Position::new(r, c);
        if start == end {
            return Ok(start);
        }
        let cursor = self.delete_range_raw(start, end)?;
        self.touched();
        Ok(cursor)
    }

    /// Insert a copy of line `row` below it. The cursor moves to the copy.
    pub fn duplicate_line(&mut self, row: usize) -> Result<Position> {
        let copy = self.line_at(row)?.clone();
        self.lines.insert(row + 1, copy);
        self.touched();
        Ok(Position::new(row + 1, 0))
    }

    /// Remove line `row`. The last remaining line is cleared instead of removed.
    pub fn delete_line(&mut self, row: usize) -> Result<Position> {
        self.check_row(row)?;
        if self.lines.len() == 1 {
            self.lines[0] = Line::new();
            self.touched();
            return Ok(Position::new(0, 0));
        }
        self.lines.remove(row);
        self.touched();
        Ok(Position::new(row.min(self.lines.len() - 1), 0))
    }

    /// Remove one leading `'\t'` from line `row`, if present.
    pub fn remove_tab(&mut self, row: usize, col: usize) -> Result<Position> {
        let line = self.line_at(row)?;
        if !line.as_str().starts_with('\t') {
            return Ok(Position::new(row, col));
        }
        self.lines[row] = line.cut(0, 1).map_err(|e| e.on_row(row))?;
        self.touched();
        Ok(Position::new(row, col.saturating_sub(1)))
    }

    // ---------------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------------

    /// Encode and write the buffer to its path.
    ///
    /// On failure the on-disk file may be partially written; the in-memory state (including
    /// `dirty`) is left unchanged.
    pub fn save(&mut self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(BufferError::NoPath);
        }
        let text = self.join(self.line_ending.as_str());
        let bytes = encoding::encode(self.encoding, &text);
        fs::write(&self.path, &bytes)?;

        self.checksum = checksum_of(&self.lines);
        self.saved_checksum = Some(self.checksum);
        self.dirty = false;
        self.on_disk = true;
        tracing::debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            version = self.version,
            "saved buffer"
        );
        Ok(())
    }

    /// Save to a new path. On failure the previous path is kept.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let previous = std::mem::replace(&mut self.path, path.into());
        let was_on_disk = self.on_disk;
        if let Err(err) = self.save() {
            self.path = previous;
            self.on_disk = was_on_disk;
            return Err(err);
        }
        Ok(())
    }

    /// Move the file on disk (if any) and point the buffer at the new path.
    pub fn rename(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if self.on_disk {
            fs::rename(&self.path, &path)?;
        }
        tracing::debug!(from = %self.path.display(), to = %path.display(), "renamed buffer");
        self.path = path;
        Ok(())
    }

    /// Delete the file on disk. The buffer stays open as an in-memory (dirty) document.
    pub fn delete_file(&mut self) -> Result<()> {
        if self.on_disk {
            fs::remove_file(&self.path)?;
        }
        self.on_disk = false;
        self.saved_checksum = None;
        self.dirty = true;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    pub(crate) fn line_at(&self, row: usize) -> Result<&Line> {
        self.lines.get(row).ok_or(BufferError::RowOutOfRange {
            row,
            len: self.lines.len(),
        })
    }

    fn check_row(&self, row: usize) -> Result<()> {
        self.line_at(row).map(|_| ())
    }

    pub(crate) fn check_position(&self, pos: Position) -> Result<()> {
        let len = self.line_at(pos.row)?.len();
        if pos.col > len {
            return Err(BufferError::ColumnOutOfRange {
                row: pos.row,
                column: pos.col,
                len,
            });
        }
        Ok(())
    }

    pub(crate) fn set_line(&mut self, row: usize, line: Line) {
        self.lines[row] = line;
    }

    pub(crate) fn insert_raw(&mut self, at: Position, text: &str) -> Result<Position> {
        let (head, tail) = self
            .line_at(at.row)?
            .split_at(at.col)
            .map_err(|e| e.on_row(at.row))?;

        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        let Some((last, middle)) = rest.split_last() else {
            let mut joined = head.as_str().to_string();
            joined.push_str(first);
            joined.push_str(tail.as_str());
            self.lines[at.row] = Line::from_text(joined);
            return Ok(Position::new(at.row, at.col + first.chars().count()));
        };

        let mut replacement = Vec::with_capacity(rest.len() + 1);
        replacement.push(head.append(&Line::from_text(first)));
        replacement.extend(middle.iter().map(|s| Line::from_text(*s)));
        replacement.push(Line::from_text(*last).append(&tail));

        self.lines.splice(at.row..=at.row, replacement);
        Ok(Position::new(at.row + rest.len(), last.chars().count()))
    }

    pub(crate) fn delete_range_raw(&mut self, start: Position, end: Position) -> Result<Position> {
        let (start, end) = ordered(start, end);
        self.check_position(start)?;
        self.check_position(end)?;

        if start.row == end.row {
            let line = &self.lines[start.row];
            self.lines[start.row] = line.cut(start.col, end.col).map_err(|e| e.on_row(start.row))?;
            return Ok(start);
        }

        let head = self.lines[start.row]
            .slice(0, start.col)
            .map_err(|e| e.on_row(start.row))?;
        let last = &self.lines[end.row];
        let tail = last.slice(end.col, last.len()).map_err(|e| e.on_row(end.row))?;
        self.lines.splice(start.row..=end.row, [head.append(&tail)]);
        Ok(start)
    }

    pub(crate) fn touched(&mut self) {
        self.version += 1;
        self.checksum = checksum_of(&self.lines);
        self.dirty = self.saved_checksum != Some(self.checksum);
        tracing::trace!(version = self.version, dirty = self.dirty, "buffer mutated");
    }
}

fn ordered(a: Position, b: Position) -> (Position, Position) {
    if b < a { (b, a) } else { (a, b) }
}

fn checksum_of(lines: &[Line]) -> Checksum {
    let mut hasher = Sha256::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(line.as_bytes());
    }
    hasher.finalize().into()
}

/// Convenience for callers holding a [`Range`].
impl Buffer {
    /// Delete the text covered by `range`.
    pub fn delete(&mut self, range: Range) -> Result<Position> {
        self.delete_range(range.start.row, range.start.col, range.end.row, range.end.col)
    }
}
