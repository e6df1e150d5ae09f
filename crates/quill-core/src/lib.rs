#![warn(missing_docs)]
//! Quill Core - headless text buffer for a code editor
//!
//! # Overview
//!
//! `quill-core` owns the editable text of one document: a list of lines addressed by
//! `(row, rune column)`, plus the file metadata needed to load and save it. It does not
//! render and it does not parse; the syntax engine (`quill-treesitter`) consumes the
//! buffer's canonical bytes and the [`ByteEdit`]s produced around each mutation.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Derived state (Versioned<T>)               │  ← Diagnostics, inlay hints
//! ├─────────────────────────────────────────────┤
//! │  Editing helpers                            │  ← Search, comment toggling, ByteEdit
//! ├─────────────────────────────────────────────┤
//! │  Buffer                                     │  ← Lines, version, dirty, save/load
//! ├─────────────────────────────────────────────┤
//! │  Line / Position / Range                    │  ← Rune-addressed text values
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use quill_core::{Buffer, CommentConfig, Position};
//!
//! let mut buffer = Buffer::from_text("main.rs", "fn main() {\n}\n");
//!
//! let cursor = buffer.insert(0, 11, "\n    println!(\"hi\");").unwrap();
//! assert_eq!(cursor, Position::new(1, 19));
//! assert_eq!(buffer.version(), 1);
//!
//! buffer.toggle_line_comment(1, 4, &CommentConfig::line("//")).unwrap();
//! assert_eq!(buffer.line(1).unwrap().as_str(), "//    println!(\"hi\");");
//!
//! let offset = buffer.byte_index(1, 4).unwrap();
//! assert_eq!(buffer.index(offset).unwrap(), Position::new(1, 4));
//! ```
//!
//! # Module Description
//!
//! - [`position`] - rune-addressed positions and half-open ranges
//! - [`line`] - immutable line values
//! - [`buffer`] - the document, file I/O and dirty tracking
//! - [`edit`] - byte-level edit descriptors for incremental consumers
//! - [`search`] - literal search
//! - [`comment`] - line and block comment toggling
//! - [`encoding`] / [`line_ending`] - on-disk representation
//! - [`diagnostics`] / [`hints`] / [`versioned`] - derived state

pub mod buffer;
pub mod comment;
pub mod diagnostics;
pub mod edit;
pub mod encoding;
pub mod error;
pub mod hints;
pub mod line;
pub mod line_ending;
pub mod position;
pub mod search;
mod text;
pub mod versioned;

pub use buffer::Buffer;
pub use diagnostics::{Diagnostic, DiagnosticSeverity, LSP_DIAGNOSTIC_PRIORITY};
pub use edit::{ByteEdit, PendingEdit, Point};
pub use error::{BufferError, Result};
pub use hints::InlayHint;
pub use line::Line;
pub use line_ending::LineEnding;
pub use position::{Position, Range};
pub use quill_lang::{BlockComment, CommentConfig};
pub use search::SearchOptions;
pub use text::sanitize;
pub use versioned::Versioned;
