use quill_core::{Buffer, Position};
use quill_treesitter::{
    analyze, outline, DocumentSyntax, LanguageConfig, LanguageRegistry, SyntaxConfig,
};
use std::sync::Arc;

fn main() {
    let mut registry = LanguageRegistry::new();
    registry.register(
        LanguageConfig::new("rust")
            .with_grammar(tree_sitter_rust::LANGUAGE)
            .with_file_pattern(r"\.rs$")
            .expect("file pattern")
            .with_highlights("", tree_sitter_rust::HIGHLIGHTS_QUERY)
            .expect("highlights query")
            .with_outline("(function_item \"fn\" @context name: (identifier) @name) @item")
            .expect("outline query"),
    );

    let mut buffer = Buffer::from_text(
        "add.rs",
        r#"// comment
fn add(a: i32, b: i32) -> i32 {
    let s = "hi";
    a + b
}
"#,
    );
    let mut syntax = DocumentSyntax::new(Arc::new(registry), SyntaxConfig::default());
    syntax.set_language_for_path("add.rs");
    syntax.init_tree(&buffer).expect("parse");

    let pending = buffer
        .begin_edit(Position::new(3, 9), Position::new(3, 9))
        .expect("edit start");
    let cursor = buffer.insert(3, 9, " +").expect("insert");
    let edit = pending.finish(&buffer, cursor).expect("edit end");
    let mode = syntax.update_tree(&buffer, &edit).expect("reparse");

    let tree = syntax.tree().expect("tree");
    let update = analyze(tree, buffer.version());
    println!("mode={mode:?} version={}", update.version);
    for row in update.matches.rows() {
        let kinds: Vec<_> = update.matches.line(row).iter().map(|m| m.kind.as_str()).collect();
        println!("{row:>3}: {}", kinds.join(" "));
    }
    for d in &update.diagnostics {
        println!("{} {}", d.range, d.message);
    }
    for item in outline(tree) {
        println!("outline: {} at {}", item.label(), item.range);
    }
}
