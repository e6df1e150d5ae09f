//! Buffer public API property tests
//!
//! A plain `String` is the model: every mutation applied to the buffer is mirrored on the
//! model through canonical byte offsets, and the two must agree afterwards.

use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};
use quill_core::{Buffer, Position};

#[derive(Debug, Clone)]
enum Operation {
    Insert { pos: usize, text: String },
    Delete { from: usize, to: usize },
    Backspace { pos: usize, count: usize },
    DeleteLine { row: usize },
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-cé👋 \t\n]{0,40}"
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    let insert = (0u16..256u16, "[xyzß\n]{0,6}")
        .prop_map(|(pos, text)| Operation::Insert { pos: pos as usize, text });
    let delete = (0u16..256u16, 0u16..256u16).prop_map(|(from, to)| Operation::Delete {
        from: from as usize,
        to: to as usize,
    });
    let backspace = (0u16..256u16, 0u16..8u16).prop_map(|(pos, count)| Operation::Backspace {
        pos: pos as usize,
        count: count as usize,
    });
    let delete_line = (0u16..16u16).prop_map(|row| Operation::DeleteLine { row: row as usize });

    prop_oneof![insert, delete, backspace, delete_line]
}

/// Byte offset of rune `pos % (runes + 1)` in `model`.
fn rune_boundary(model: &str, pos: usize) -> usize {
    let runes = model.chars().count();
    let target = pos % (runes + 1);
    model
        .char_indices()
        .nth(target)
        .map(|(idx, _)| idx)
        .unwrap_or(model.len())
}

fn position_of(buffer: &Buffer, offset: usize) -> Position {
    buffer.index(offset).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn buffer_operations_match_string_model(
        initial in text_strategy(),
        ops in proptest::collection::vec(operation_strategy(), 0..20)
    ) {
        let mut buffer = Buffer::from_text("prop", &initial);
        let mut model = initial.clone();

        for op in ops {
            match op {
                Operation::Insert { pos, text } => {
                    let at = rune_boundary(&model, pos);
                    let p = position_of(&buffer, at);
                    buffer.insert(p.row, p.col, &text).unwrap();
                    model.insert_str(at, &text);
                }
                Operation::Delete { from, to } => {
                    let (a, b) = (rune_boundary(&model, from), rune_boundary(&model, to));
                    let (a, b) = (a.min(b), a.max(b));
                    let (pa, pb) = (position_of(&buffer, a), position_of(&buffer, b));
                    let cursor = buffer.delete_range(pa.row, pa.col, pb.row, pb.col).unwrap();
                    prop_assert_eq!(cursor, pa);
                    model.replace_range(a..b, "");
                }
                Operation::Backspace { pos, count } => {
                    let end = rune_boundary(&model, pos);
                    let p = position_of(&buffer, end);
                    buffer.delete_before(p.row, p.col, count).unwrap();
                    let start = model[..end]
                        .char_indices()
                        .rev()
                        .nth(count.saturating_sub(1))
                        .map(|(idx, _)| idx)
                        .unwrap_or(0);
                    if count > 0 {
                        model.replace_range(start..end, "");
                    }
                }
                Operation::DeleteLine { row } => {
                    let row = row % buffer.lines_len();
                    buffer.delete_line(row).unwrap();
                    let mut rows: Vec<&str> = model.split('\n').collect();
                    if rows.len() == 1 {
                        rows[0] = "";
                    } else {
                        rows.remove(row);
                    }
                    model = rows.join("\n");
                }
            }

            prop_assert!(buffer.lines_len() >= 1);
            prop_assert_eq!(buffer.string(), model.clone());
        }

        prop_assert_eq!(buffer.lines_len(), model.split('\n').count());
    }

    #[test]
    fn byte_index_and_index_round_trip(text in text_strategy()) {
        let buffer = Buffer::from_text("prop", &text);
        for (row, line) in buffer.lines().iter().enumerate() {
            for col in 0..=line.len() {
                let offset = buffer.byte_index(row, col).unwrap();
                prop_assert_eq!(buffer.index(offset).unwrap(), Position::new(row, col));
            }
        }
        prop_assert_eq!(buffer.bytes().len(), buffer.bytes_len());
    }

    #[test]
    fn loading_never_adds_trailing_newline(text in text_strategy()) {
        let buffer = Buffer::from_reader(
            "prop",
            text.as_bytes(),
            "utf-8",
            quill_core::LineEnding::Auto,
        ).unwrap();
        prop_assert!(buffer.lines_len() >= 1);
        prop_assert_eq!(buffer.string(), text);
    }
}
