#![allow(dead_code)]

use quill_core::{Buffer, ByteEdit, Position};
use quill_lang::CommentConfig;
use quill_treesitter::{LanguageConfig, LanguageRegistry};
use std::sync::{Arc, Once};

/// Initialize the global tracing subscriber once (used by tests that run with `RUST_LOG`).
pub fn init_tracing_from_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stdout);
        let _ = subscriber.try_init();
    });
}

pub const RUST_LOCALS: &str = r#"
(block) @local.scope
(let_declaration pattern: (identifier) @local.definition)
(parameter pattern: (identifier) @local.definition)
(identifier) @local.reference
"#;

pub const RUST_HIGHLIGHTS: &str = r#"
(let_declaration pattern: (identifier) @variable.definition)
(parameter pattern: (identifier) @variable.parameter)
(function_item name: (identifier) @function)
"fn" @keyword
"let" @keyword
(integer_literal) @number
(identifier) @variable
"#;

pub const RUST_OUTLINE: &str = r#"
(function_item
  "fn" @context
  name: (identifier) @name
  parameters: (parameters) @context.extra) @item
"#;

pub fn rust() -> LanguageConfig {
    LanguageConfig::new("rust")
        .with_grammar(tree_sitter_rust::LANGUAGE)
        .with_file_pattern(r"\.rs$")
        .unwrap()
        .with_comment(CommentConfig::line_and_block("//", "/*", "*/"))
        .with_highlights(RUST_LOCALS, RUST_HIGHLIGHTS)
        .unwrap()
        .with_outline(RUST_OUTLINE)
        .unwrap()
}

pub fn javascript() -> LanguageConfig {
    LanguageConfig::new("javascript")
        .with_alias("js")
        .with_grammar(tree_sitter_javascript::LANGUAGE)
        .with_file_pattern(r"\.m?js$")
        .unwrap()
        .with_mime_type("text/javascript")
        .with_highlights("", "(identifier) @variable\n\"let\" @keyword")
        .unwrap()
}

pub const HTML_INJECTIONS: &str = r#"
((script_element
   (start_tag (attribute (quoted_attribute_value (attribute_value) @injection.mimetype)))
   (raw_text) @injection.content))

((script_element
   (start_tag . (tag_name) .)
   (raw_text) @injection.content)
 (#set! injection.language "javascript"))
"#;

pub fn html() -> LanguageConfig {
    LanguageConfig::new("html")
        .with_grammar(tree_sitter_html::LANGUAGE)
        .with_file_pattern(r"\.html?$")
        .unwrap()
        .with_highlights("", "(tag_name) @tag")
        .unwrap()
        .with_injections(HTML_INJECTIONS)
        .unwrap()
}

/// Registry whose html language uses `injections` instead of [`HTML_INJECTIONS`].
pub fn registry_with_html_injections(injections: &str) -> Arc<LanguageRegistry> {
    let html = LanguageConfig::new("html")
        .with_grammar(tree_sitter_html::LANGUAGE)
        .with_file_pattern(r"\.html?$")
        .unwrap()
        .with_injections(injections)
        .unwrap();
    Arc::new(LanguageRegistry::new().with(javascript()).with(html))
}

pub fn registry() -> Arc<LanguageRegistry> {
    Arc::new(
        LanguageRegistry::new()
            .with(rust())
            .with(javascript())
            .with(html())
            .with(LanguageConfig::new("plain").with_file_pattern(r"\.txt$").unwrap()),
    )
}

/// Insert `text` at `pos`, returning the edit descriptor for the parser.
pub fn insert(buffer: &mut Buffer, pos: Position, text: &str) -> ByteEdit {
    let pending = buffer.begin_edit(pos, pos).unwrap();
    let cursor = buffer.insert(pos.row, pos.col, text).unwrap();
    pending.finish(buffer, cursor).unwrap()
}

/// Delete `[start, end)`, returning the edit descriptor for the parser.
pub fn delete(buffer: &mut Buffer, start: Position, end: Position) -> ByteEdit {
    let pending = buffer.begin_edit(start, end).unwrap();
    let cursor = buffer
        .delete_range(start.row, start.col, end.row, end.col)
        .unwrap();
    pending.finish(buffer, cursor).unwrap()
}
