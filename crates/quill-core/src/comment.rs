//! Comment toggling.
//!
//! Tokens come from a [`CommentConfig`]. Every configured token is recognized when deciding
//! whether text is already commented; the first configured token is the one inserted. All
//! columns are rune columns and the returned cursor accounts for the tokens added or removed.
//!
//! Line comments insert the bare token at column 0 and remove the token found right after
//! the indentation, leaving surrounding whitespace alone. Toggling twice therefore restores
//! any uncommented line and any line commented at column 0.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::line::Line;
use crate::position::Position;
use quill_lang::{BlockComment, CommentConfig};

fn rune_len(s: &str) -> usize {
    s.chars().count()
}

/// The longest configured line token that starts `text`.
fn leading_token<'a>(config: &'a CommentConfig, text: &str) -> Option<&'a str> {
    config
        .line_tokens()
        .filter(|token| text.starts_with(token))
        .max_by_key(|token| token.len())
}

fn is_commented(line: &Line, config: &CommentConfig) -> bool {
    let indent = line.indent_len();
    leading_token(config, &line.as_str()[indent..]).is_some()
}

impl Buffer {
    /// Toggle a line comment on `row`, keeping the cursor at `col` on the same text.
    ///
    /// A no-op when `config` has no line token.
    pub fn toggle_line_comment(
        &mut self,
        row: usize,
        col: usize,
        config: &CommentConfig,
    ) -> Result<Position> {
        self.check_position(Position::new(row, col))?;
        let Some(insert_token) = config.line_tokens().next() else {
            return Ok(Position::new(row, col));
        };

        match self.toggle_row(row, col, config, insert_token, None)? {
            Some(col) => {
                self.touched();
                Ok(Position::new(row, col))
            }
            None => Ok(Position::new(row, col)),
        }
    }

    /// Toggle line comments on rows `start_row..=end_row`.
    ///
    /// If every non-blank row is already commented the rows are uncommented, otherwise each
    /// non-blank row is commented. Blank rows are left alone and the version only moves when
    /// a row changed. Returns the end of `end_row`.
    pub fn toggle_line_comments(
        &mut self,
        start_row: usize,
        end_row: usize,
        config: &CommentConfig,
    ) -> Result<Position> {
        let (start_row, end_row) = if end_row < start_row {
            (end_row, start_row)
        } else {
            (start_row, end_row)
        };
        self.line_at(end_row)?;
        let Some(insert_token) = config.line_tokens().next() else {
            let len = self.line_at(end_row)?.len();
            return Ok(Position::new(end_row, len));
        };

        let rows = &self.lines()[start_row..=end_row];
        let uncomment = rows
            .iter()
            .filter(|line| !line.is_blank())
            .all(|line| is_commented(line, config));
        let force = Some(!uncomment);

        let mut changed = false;
        for row in start_row..=end_row {
            if self.lines()[row].is_blank() {
                continue;
            }
            changed |= self.toggle_row(row, 0, config, insert_token, force)?.is_some();
        }
        if changed {
            self.touched();
        }

        let len = self.line_at(end_row)?.len();
        Ok(Position::new(end_row, len))
    }

    /// Toggle a block comment around `[start, end)`.
    ///
    /// A configured pair is removed when the range starts and ends with it, or when it sits
    /// immediately outside the range; pairs are tried in configuration order and the first
    /// one matching on both sides wins. Otherwise the first pair is inserted around the
    /// range. Returns the adjusted `end`.
    pub fn toggle_block_comment(
        &mut self,
        start: Position,
        end: Position,
        config: &CommentConfig,
    ) -> Result<Position> {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        self.check_position(start)?;
        self.check_position(end)?;
        let Some(insert_pair) = config.block_pairs().next() else {
            return Ok(end);
        };

        let selected = self.text_range(start, end)?;
        let same_row = start.row == end.row;

        for pair in config.block_pairs() {
            let (s_len, e_len) = (rune_len(&pair.start), rune_len(&pair.end));

            if self.wraps_inside(&selected, pair) {
                self.delete_range_raw(Position::new(end.row, end.col - e_len), end)?;
                self.delete_range_raw(start, Position::new(start.row, start.col + s_len))?;
                self.touched();
                let col = if same_row { end.col - e_len - s_len } else { end.col - e_len };
                return Ok(Position::new(end.row, col));
            }

            if self.wraps_outside(start, end, pair)? {
                self.delete_range_raw(end, Position::new(end.row, end.col + e_len))?;
                self.delete_range_raw(Position::new(start.row, start.col - s_len), start)?;
                self.touched();
                let col = if same_row { end.col - s_len } else { end.col };
                return Ok(Position::new(end.row, col));
            }
        }

        self.insert_raw(end, &insert_pair.end)?;
        self.insert_raw(start, &insert_pair.start)?;
        self.touched();
        let (s_len, e_len) = (rune_len(&insert_pair.start), rune_len(&insert_pair.end));
        let col = if same_row { end.col + s_len + e_len } else { end.col + e_len };
        Ok(Position::new(end.row, col))
    }

    /// Comment or uncomment one row without bumping the version. `force` overrides the
    /// per-row decision (`Some(true)` comments). Returns the adjusted column, or `None` when
    /// the row was left unchanged.
    fn toggle_row(
        &mut self,
        row: usize,
        col: usize,
        config: &CommentConfig,
        insert_token: &str,
        force: Option<bool>,
    ) -> Result<Option<usize>> {
        let line = self.line_at(row)?;
        let indent = line.indent_len();
        let existing = leading_token(config, &line.as_str()[indent..]);
        let comment = force.unwrap_or(existing.is_none());

        match (comment, existing) {
            (false, Some(token)) => {
                let removed = rune_len(token);
                let updated = line
                    .cut(indent, indent + removed)
                    .map_err(|e| e.on_row(row))?;
                self.set_line(row, updated);
                Ok(Some(if col > indent {
                    col - removed.min(col - indent)
                } else {
                    col
                }))
            }
            (false, None) => Ok(None),
            (true, _) => {
                let updated = line.insert(0, insert_token).map_err(|e| e.on_row(row))?;
                self.set_line(row, updated);
                Ok(Some(col + rune_len(insert_token)))
            }
        }
    }

    fn wraps_inside(&self, selected: &str, pair: &BlockComment) -> bool {
        selected.len() >= pair.start.len() + pair.end.len()
            && selected.starts_with(&pair.start)
            && selected.ends_with(&pair.end)
    }

    fn wraps_outside(&self, start: Position, end: Position, pair: &BlockComment) -> Result<bool> {
        let (s_len, e_len) = (rune_len(&pair.start), rune_len(&pair.end));
        if start.col < s_len {
            return Ok(false);
        }
        let end_line = self.line_at(end.row)?;
        if end.col + e_len > end_line.len() {
            return Ok(false);
        }
        let before = self
            .line_at(start.row)?
            .slice_str(start.col - s_len, start.col)
            .map_err(|e| e.on_row(start.row))?;
        let after = end_line
            .slice_str(end.col, end.col + e_len)
            .map_err(|e| e.on_row(end.row))?;
        Ok(before == pair.start && after == pair.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_comment_round_trip_moves_cursor() {
        let mut buffer = Buffer::from_text("t", "let x = 1;");
        let config = CommentConfig::line("//");

        let cursor = buffer.toggle_line_comment(0, 0, &config).unwrap();
        assert_eq!(buffer.string(), "//let x = 1;");
        assert_eq!(cursor, Position::new(0, 2));

        let cursor = buffer.toggle_line_comment(0, 2, &config).unwrap();
        assert_eq!(buffer.string(), "let x = 1;");
        assert_eq!(cursor, Position::new(0, 0));
    }

    #[test]
    fn test_line_comment_goes_before_indentation() {
        let mut buffer = Buffer::from_text("t", "    foo();");
        let config = CommentConfig::line("#").with_line("//");
        let cursor = buffer.toggle_line_comment(0, 6, &config).unwrap();
        assert_eq!(buffer.string(), "#    foo();");
        assert_eq!(cursor, Position::new(0, 7));

        let mut other = Buffer::from_text("t", "    // foo();");
        let cursor = other.toggle_line_comment(0, 8, &config).unwrap();
        assert_eq!(other.string(), "     foo();");
        assert_eq!(cursor, Position::new(0, 6));
    }

    #[test]
    fn test_toggling_twice_keeps_commented_lines() {
        let config = CommentConfig::line("//");
        for original in ["//x", "//  x", "/// x", "// x", "//", "  x", "x"] {
            let mut buffer = Buffer::from_text("t", original);
            let cursor = buffer.toggle_line_comment(0, 0, &config).unwrap();
            buffer.toggle_line_comment(0, cursor.col, &config).unwrap();
            assert_eq!(buffer.string(), original);
        }
    }

    #[test]
    fn test_longest_line_token_is_removed() {
        let mut buffer = Buffer::from_text("t", "/// docs");
        let config = CommentConfig::line("//").with_line("///");
        buffer.toggle_line_comment(0, 0, &config).unwrap();
        assert_eq!(buffer.string(), " docs");
    }

    #[test]
    fn test_multi_line_toggle_skips_blank_rows() {
        let mut buffer = Buffer::from_text("t", "a\n\n  b\nc");
        let config = CommentConfig::line("//");

        buffer.toggle_line_comments(0, 3, &config).unwrap();
        assert_eq!(buffer.string(), "//a\n\n//  b\n//c");

        buffer.toggle_line_comments(0, 3, &config).unwrap();
        assert_eq!(buffer.string(), "a\n\n  b\nc");
        assert_eq!(buffer.version(), 2);
    }

    #[test]
    fn test_blank_rows_only_leave_version_alone() {
        let mut buffer = Buffer::from_text("t", "a\n\n  \nb");
        let config = CommentConfig::line("//");

        let end = buffer.toggle_line_comments(1, 2, &config).unwrap();
        assert_eq!(end, Position::new(2, 2));
        assert_eq!(buffer.string(), "a\n\n  \nb");
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn test_mixed_rows_are_all_commented() {
        let mut buffer = Buffer::from_text("t", "// a\nb");
        let config = CommentConfig::line("//");
        buffer.toggle_line_comments(0, 1, &config).unwrap();
        assert_eq!(buffer.string(), "//// a\n//b");
    }

    #[test]
    fn test_block_comment_inline_round_trip() {
        let mut buffer = Buffer::from_text("t", "abc");
        let config = CommentConfig::block("/*", "*/");

        let end = buffer
            .toggle_block_comment(Position::new(0, 1), Position::new(0, 2), &config)
            .unwrap();
        assert_eq!(buffer.string(), "a/*b*/c");
        assert_eq!(end, Position::new(0, 6));

        let end = buffer
            .toggle_block_comment(Position::new(0, 1), end, &config)
            .unwrap();
        assert_eq!(buffer.string(), "abc");
        assert_eq!(end, Position::new(0, 2));
    }

    #[test]
    fn test_block_comment_detected_outside_selection() {
        let mut buffer = Buffer::from_text("t", "a<!--b-->c");
        let config = CommentConfig::block("/*", "*/").with_block("<!--", "-->");
        let end = buffer
            .toggle_block_comment(Position::new(0, 5), Position::new(0, 6), &config)
            .unwrap();
        assert_eq!(buffer.string(), "abc");
        assert_eq!(end, Position::new(0, 2));
    }

    #[test]
    fn test_block_comment_across_rows() {
        let mut buffer = Buffer::from_text("t", "one\ntwo");
        let config = CommentConfig::block("/*", "*/");
        let end = buffer
            .toggle_block_comment(Position::new(0, 0), Position::new(1, 3), &config)
            .unwrap();
        assert_eq!(buffer.string(), "/*one\ntwo*/");
        assert_eq!(end, Position::new(1, 5));

        buffer
            .toggle_block_comment(Position::new(0, 0), end, &config)
            .unwrap();
        assert_eq!(buffer.string(), "one\ntwo");
    }
}
