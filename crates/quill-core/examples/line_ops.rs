use quill_core::{Buffer, Position};

fn main() {
    let mut buffer = Buffer::from_text("notes.txt", "a\nb\nc");

    // Duplicate the middle line.
    let cursor = buffer.duplicate_line(1).unwrap();
    assert_eq!(cursor, Position::new(2, 0));
    assert_eq!(buffer.string(), "a\nb\nb\nc");

    // Backspace at the start of a line joins it with the previous one.
    let cursor = buffer.delete_before(1, 0, 1).unwrap();
    assert_eq!(cursor, Position::new(0, 1));
    assert_eq!(buffer.string(), "ab\nb\nc");

    // Deleting the only remaining line clears it.
    for _ in 0..3 {
        buffer.delete_line(0).unwrap();
    }
    assert_eq!(buffer.lines_len(), 1);
    assert_eq!(buffer.string(), "");

    let hits = Buffer::from_text("x", "one two one").search("one");
    println!("version={} hits={:?}", buffer.version(), hits);
}
