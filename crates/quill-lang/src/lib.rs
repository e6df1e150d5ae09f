#![warn(missing_docs)]
//! `quill-lang` - data-driven language configuration helpers for `quill-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any
//! parsing/highlighting systems. It provides small structs that hosts can use to configure
//! buffer features in a language-aware way.

/// A block comment token pair such as `/*` … `*/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment {
    /// Opening token (e.g. `/*`).
    pub start: String,
    /// Closing token (e.g. `*/`).
    pub end: String,
}

impl BlockComment {
    /// Create a new block comment pair.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn is_valid(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }
}

/// Comment tokens for a given language.
///
/// A language may declare several line tokens (e.g. `//` and `///`) and several block pairs
/// (e.g. `/*`/`*/` and `<!--`/`-->`). Toggling inserts the **first** configured token, but
/// recognizes any of them when deciding whether text is already commented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment tokens, in preference order.
    pub line: Vec<String>,
    /// Block comment token pairs, in preference order.
    pub block: Vec<BlockComment>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: vec![token.into()],
            block: Vec::new(),
        }
    }

    /// Create a config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: Vec::new(),
            block: vec![BlockComment::new(start, end)],
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: vec![line.into()],
            block: vec![BlockComment::new(block_start, block_end)],
        }
    }

    /// Add another line comment token.
    pub fn with_line(mut self, token: impl Into<String>) -> Self {
        self.line.push(token.into());
        self
    }

    /// Add another block comment pair.
    pub fn with_block(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.block.push(BlockComment::new(start, end));
        self
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.iter().any(|t| !t.is_empty())
    }

    /// Returns `true` if a block comment pair is configured.
    pub fn has_block(&self) -> bool {
        self.block.iter().any(BlockComment::is_valid)
    }

    /// Line tokens, skipping empty entries.
    pub fn line_tokens(&self) -> impl Iterator<Item = &str> {
        self.line.iter().map(String::as_str).filter(|t| !t.is_empty())
    }

    /// Block pairs, skipping pairs with an empty side.
    pub fn block_pairs(&self) -> impl Iterator<Item = &BlockComment> {
        self.block.iter().filter(|b| b.is_valid())
    }
}
