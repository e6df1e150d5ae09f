//! Literal text search over a [`Buffer`].
//!
//! The term is escaped and compiled into a regex, then run over the canonical (LF-joined)
//! text. Matches are non-overlapping and reported as rune-addressed [`Range`]s, so a term
//! containing `'\n'` may span lines.

use crate::buffer::Buffer;
use crate::position::{Position, Range};
use regex::{Regex, RegexBuilder};

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (alphanumeric and `_`).
    pub whole_word: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
        }
    }
}

fn compile_search_regex(term: &str, options: SearchOptions) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(!options.case_sensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(%err, "search term could not be compiled");
            None
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Maps canonical byte offsets to positions for a single search pass.
struct Locator<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> Locator<'a> {
    fn new(text: &'a str, line_starts: Vec<usize>) -> Self {
        Self { text, line_starts }
    }

    fn position(&self, offset: usize) -> Position {
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts[row];
        let col = self.text[start..offset].chars().count();
        Position::new(row, col)
    }
}

impl Buffer {
    /// Find every non-overlapping occurrence of `term`. An empty term matches nothing.
    pub fn search(&self, term: &str) -> Vec<Range> {
        self.search_with(term, SearchOptions::default())
    }

    /// [`Buffer::search`] with explicit options.
    pub fn search_with(&self, term: &str, options: SearchOptions) -> Vec<Range> {
        if term.is_empty() {
            return Vec::new();
        }
        let Some(re) = compile_search_regex(term, options) else {
            return Vec::new();
        };

        let text = self.string();
        let locator = Locator::new(&text, self.line_starts());
        re.find_iter(&text)
            .filter(|m| !m.is_empty())
            .filter(|m| !options.whole_word || is_whole_word(&text, m.start(), m.end()))
            .map(|m| Range::new(locator.position(m.start()), locator.position(m.end())))
            .collect()
    }
}
