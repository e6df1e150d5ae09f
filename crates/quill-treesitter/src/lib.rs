#![warn(missing_docs)]
//! `quill-treesitter` - Tree-sitter integration for `quill-core`.
//!
//! This crate keeps a parse tree in sync with a [`quill_core::Buffer`] and derives document
//! state from it:
//!
//! - incremental parsing with language injections ([`DocumentSyntax`], [`SyntaxTree`])
//! - highlight matches with local-scope resolution ([`highlight`], [`MatchMap`])
//! - syntax diagnostics ([`validate`])
//! - symbol outlines ([`outline`])
//!
//! Languages are described by [`LanguageConfig`] values collected in a [`LanguageRegistry`]
//! owned by the host. Derived results are tagged with the buffer version they were computed
//! for and stored in [`DocumentAnnotations`], which drops results that arrive late.
//!
//! ```no_run
//! use quill_core::{Buffer, Position};
//! use quill_treesitter::{analyze, DocumentSyntax, LanguageConfig, LanguageRegistry, SyntaxConfig};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let language: tree_sitter::Language = unimplemented!();
//! let mut registry = LanguageRegistry::new();
//! registry.register(
//!     LanguageConfig::new("rust")
//!         .with_grammar(language)
//!         .with_file_pattern(r"\.rs$")?
//!         .with_highlights("(block) @local.scope", "(identifier) @variable")?,
//! );
//!
//! let mut buffer = Buffer::from_text("main.rs", "fn main() {}\n");
//! let mut syntax = DocumentSyntax::new(Arc::new(registry), SyntaxConfig::default());
//! syntax.set_language_for_path("main.rs");
//! syntax.init_tree(&buffer)?;
//!
//! let pending = buffer.begin_edit(Position::new(0, 11), Position::new(0, 11))?;
//! let cursor = buffer.insert(0, 11, " 1 ")?;
//! let edit = pending.finish(&buffer, cursor)?;
//! syntax.update_tree(&buffer, &edit)?;
//!
//! if let Some(snapshot) = syntax.snapshot() {
//!     let update = analyze(&snapshot, buffer.version());
//!     println!("{} matches", update.matches.len());
//! }
//! # Ok(())
//! # }
//! ```

mod annotations;
mod config;
mod error;
mod highlight;
mod outline;
mod parser;
mod query;
mod registry;
mod source;
mod tree;
mod validate;

pub use annotations::{analyze, DocumentAnnotations, SyntaxUpdate};
pub use config::{SyntaxConfig, DEFAULT_MAX_INJECTION_DEPTH, DEFAULT_PARSE_TIMEOUT};
pub use error::SyntaxError;
pub use highlight::{highlight, highlight_tree, Match, MatchMap};
pub use outline::{outline, OutlineChar, OutlineItem};
pub use parser::{DocumentSyntax, UpdateMode};
pub use query::{HighlightQuery, InjectionQuery, OutlineQuery, DEFAULT_PRIORITY};
pub use registry::{Grammar, LanguageConfig, LanguageRegistry};
pub use source::SourceText;
pub use tree::SyntaxTree;
pub use validate::{validate, SYNTAX_ERROR_PRIORITY, SYNTAX_SOURCE};
