use crate::source::SourceText;
use crate::tree::SyntaxTree;
use quill_core::{Position, Range};
use streaming_iterator::StreamingIterator;
use tree_sitter::QueryCursor;

/// One character of an outline label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineChar {
    /// The character.
    pub ch: char,
    /// Where the character sits in the buffer; `None` for decorative text.
    pub position: Option<Position>,
}

/// A navigable symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    /// Range of the whole item (e.g. the entire function).
    pub range: Range,
    /// Label characters: context, name and extra context in document order.
    pub text: Vec<OutlineChar>,
}

impl OutlineItem {
    /// The label as a string.
    pub fn label(&self) -> String {
        self.text.iter().map(|c| c.ch).collect()
    }

    /// Position of the first navigable character, if any.
    pub fn name_position(&self) -> Option<Position> {
        self.text.iter().find_map(|c| c.position)
    }
}

#[derive(Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    navigable: bool,
}

/// Run the language's outline query over the document tree.
///
/// One item per query match, in match order. Injected languages are not included.
pub fn outline(tree: &SyntaxTree) -> Vec<OutlineItem> {
    let Some(query) = tree.language().grammar().and_then(|g| g.outline()) else {
        return Vec::new();
    };
    let source = tree.source();
    let bytes = source.as_bytes();

    let mut items = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query.query, tree.root_node(), bytes);
    while let Some(m) = matches.next() {
        let mut item = None;
        let mut spans = Vec::new();
        for capture in m.captures {
            let node = capture.node;
            let index = Some(capture.index);
            if capture.index == query.item {
                item = Some(node);
            } else if index == query.name || index == query.context || index == query.extra {
                spans.push(Span {
                    start: node.start_byte(),
                    end: node.end_byte(),
                    navigable: index == query.name,
                });
            }
        }
        let Some(item) = item else {
            continue;
        };

        let range = Range::new(
            source.position(item.start_position()),
            source.position(item.end_position()),
        );
        let text = label_chars(source, &mut spans, range);
        items.push(OutlineItem { range, text });
    }
    tracing::debug!(language = tree.name(), items = items.len(), "outline");
    items
}

fn label_chars(source: &SourceText, spans: &mut [Span], item: Range) -> Vec<OutlineChar> {
    spans.sort_by_key(|s| (s.start, s.end));

    let mut out = Vec::new();
    let mut last_end = None;
    for span in spans.iter() {
        let start = match last_end {
            Some(end) if span.start < end => end,
            _ => span.start,
        };
        if start >= span.end {
            continue;
        }
        if last_end.is_some_and(|end| start > end) {
            out.push(OutlineChar {
                ch: ' ',
                position: None,
            });
        }
        last_end = Some(span.end);

        let Some(slice) = source.as_str().get(start..span.end) else {
            continue;
        };
        let Position { mut row, mut col } = source.position_of_byte(start);
        for ch in slice.chars() {
            if ch == '\n' {
                row += 1;
                col = 0;
                continue;
            }
            let navigable = span.navigable && item.start.row <= row && row <= item.end.row;
            out.push(OutlineChar {
                ch,
                position: navigable.then(|| Position::new(row, col)),
            });
            col += 1;
        }
    }
    out
}
