use quill_core::{Buffer, CommentConfig, Position};

fn main() {
    let mut buffer = Buffer::from_text("main.rs", "fn main() {\n    println!(\"hi\");\n}\n");
    let config = CommentConfig::line_and_block("//", "/*", "*/");

    // Toggle a line comment on the current line.
    let cursor = buffer.toggle_line_comment(1, 4, &config).unwrap();
    assert_eq!(cursor, Position::new(1, 6));
    assert_eq!(buffer.string(), "fn main() {\n//    println!(\"hi\");\n}\n");

    // Toggling again restores the original text.
    buffer.toggle_line_comment(1, 6, &config).unwrap();
    assert_eq!(buffer.string(), "fn main() {\n    println!(\"hi\");\n}\n");

    // Wrap `main` in a block comment.
    let end = buffer
        .toggle_block_comment(Position::new(0, 3), Position::new(0, 7), &config)
        .unwrap();
    assert_eq!(end, Position::new(0, 11));
    assert_eq!(buffer.line(0).unwrap().as_str(), "fn /*main*/() {");
    println!("version={} dirty={}", buffer.version(), buffer.dirty());
}
