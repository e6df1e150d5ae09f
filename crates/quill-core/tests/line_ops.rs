use pretty_assertions::assert_eq;
use quill_core::{Buffer, BufferError, Position};

fn lines(buffer: &Buffer) -> Vec<String> {
    buffer.lines().iter().map(|l| l.to_string()).collect()
}

#[test]
fn test_duplicate_line_moves_cursor_to_duplicate() {
    let mut buffer = Buffer::from_text("t", "a\nb\nc");
    let cursor = buffer.duplicate_line(1).unwrap();

    assert_eq!(buffer.string(), "a\nb\nb\nc");
    assert_eq!(cursor, Position::new(2, 0));
}

#[test]
fn test_delete_line_keeps_one_line() {
    let mut buffer = Buffer::from_text("t", "only");
    let cursor = buffer.delete_line(0).unwrap();
    assert_eq!(cursor, Position::new(0, 0));
    assert_eq!(lines(&buffer), vec![""]);
    assert_eq!(buffer.lines_len(), 1);
}

#[test]
fn test_delete_last_line_moves_cursor_up() {
    let mut buffer = Buffer::from_text("t", "a\nb\nc");
    let cursor = buffer.delete_line(2).unwrap();
    assert_eq!(cursor, Position::new(1, 0));
    assert_eq!(lines(&buffer), vec!["a", "b"]);
}

#[test]
fn test_insert_and_delete_range_with_multibyte_text() {
    let mut buffer = Buffer::from_text("t", "a👋b\nc");
    let cursor = buffer.insert(0, 2, "é\n").unwrap();
    assert_eq!(lines(&buffer), vec!["a👋é", "b", "c"]);
    assert_eq!(cursor, Position::new(1, 0));

    let cursor = buffer.delete_range(0, 1, 1, 1).unwrap();
    assert_eq!(lines(&buffer), vec!["a", "c"]);
    assert_eq!(cursor, Position::new(0, 1));
}

#[test]
fn test_replace_across_lines() {
    let mut buffer = Buffer::from_text("t", "fn a() {\n    1\n}");
    let cursor = buffer.replace(0, 3, 2, 0, "b() { 2 ").unwrap();
    assert_eq!(buffer.string(), "fn b() { 2 }");
    assert_eq!(cursor, Position::new(0, 11));
}

#[test]
fn test_replace_line_with_empty_text() {
    let mut buffer = Buffer::from_text("t", "lol\n()\n");
    buffer.replace(1, 0, 1, 2, "").unwrap();
    assert_eq!(buffer.bytes(), b"lol\n\n".to_vec());
}

#[test]
fn test_backspace_and_delete_across_boundaries() {
    let mut buffer = Buffer::from_text("t", "ab\n\ncd");
    let cursor = buffer.delete_before(2, 0, 2).unwrap();
    assert_eq!(buffer.string(), "abcd");
    assert_eq!(cursor, Position::new(0, 2));

    let cursor = buffer.delete_after(0, 1, 10).unwrap();
    assert_eq!(buffer.string(), "a");
    assert_eq!(cursor, Position::new(0, 1));
}

#[test]
fn test_remove_tab_only_removes_one() {
    let mut buffer = Buffer::from_text("t", "\t\tx");
    buffer.remove_tab(0, 0).unwrap();
    assert_eq!(buffer.string(), "\tx");
    buffer.remove_tab(0, 0).unwrap();
    buffer.remove_tab(0, 0).unwrap();
    assert_eq!(buffer.string(), "x");
}

#[test]
fn test_failed_mutation_leaves_buffer_untouched() {
    let mut buffer = Buffer::from_text("t", "abc\ndef");
    let before = buffer.string();

    let err = buffer.delete_range(0, 1, 5, 0).unwrap_err();
    assert!(matches!(err, BufferError::RowOutOfRange { row: 5, len: 2 }));

    let err = buffer.replace(1, 4, 1, 2, "x").unwrap_err();
    assert!(matches!(
        err,
        BufferError::ColumnOutOfRange { row: 1, column: 4, len: 3 }
    ));

    assert_eq!(buffer.string(), before);
    assert_eq!(buffer.version(), 0);
}
