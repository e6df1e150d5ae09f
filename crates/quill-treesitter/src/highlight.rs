//! Highlighting with local-scope resolution.
//!
//! Highlight queries are compiled with their locals patterns in front (see
//! [`HighlightQuery`](crate::HighlightQuery)). Captures from the locals patterns maintain a
//! stack of lexical scopes and the definitions inside them; captures from the styling
//! patterns become [`Match`]es. A styling capture on a node that references a known local
//! definition carries that definition's highlight name as [`Match::reference_type`].

use crate::tree::SyntaxTree;
use quill_core::{Position, Range};
use std::collections::BTreeMap;
use streaming_iterator::StreamingIterator;
use tree_sitter::QueryCursor;

/// One styled span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Covered text, half-open.
    pub range: Range,
    /// Highlight name of the styling capture (e.g. `"variable"`).
    pub kind: String,
    /// Highlight name of the local definition this span refers to; empty if none.
    pub reference_type: String,
    /// Tie-break for overlapping matches; higher wins.
    pub priority: i32,
    /// Name of the language that produced the match.
    pub source: String,
}

/// Matches indexed by every row they touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchMap {
    rows: BTreeMap<usize, Vec<Match>>,
}

impl MatchMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `m` on each row its range spans.
    ///
    /// A range ending at column 0 of a later row does not touch that row.
    pub fn insert(&mut self, m: Match) {
        let start = m.range.start.row;
        let mut end = m.range.end.row;
        if m.range.end.col == 0 && end > start {
            end -= 1;
        }
        for row in start..end {
            self.rows.entry(row).or_default().push(m.clone());
        }
        self.rows.entry(end).or_default().push(m);
    }

    /// Append every match of `other`, after the ones already recorded per row.
    pub fn merge(&mut self, other: MatchMap) {
        for (row, matches) in other.rows {
            self.rows.entry(row).or_default().extend(matches);
        }
    }

    /// Matches touching `row`, in insertion order.
    pub fn line(&self, row: usize) -> &[Match] {
        self.rows.get(&row).map_or(&[], Vec::as_slice)
    }

    /// The match that styles `position`: highest priority, ties to the latest inserted.
    pub fn style_at(&self, position: Position) -> Option<&Match> {
        self.line(position.row)
            .iter()
            .filter(|m| m.range.contains(position))
            .fold(None, |best: Option<&Match>, m| match best {
                Some(b) if b.priority > m.priority => Some(b),
                _ => Some(m),
            })
    }

    /// Rows that have at least one match.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    /// Number of recorded entries; a multi-row match counts once per row.
    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

struct LocalDef {
    name: String,
    kind: Option<String>,
}

struct LocalScope {
    inherits: bool,
    end_byte: usize,
    defs: Vec<LocalDef>,
}

impl LocalScope {
    fn root() -> Self {
        Self {
            inherits: false,
            end_byte: usize::MAX,
            defs: Vec::new(),
        }
    }
}

/// Highlight every tree in `tree` (sub-trees in parallel) and merge the results.
///
/// Per-tree results are merged in [`SyntaxTree::flatten`] order, so the outcome does not
/// depend on thread scheduling.
pub fn highlight(tree: &SyntaxTree) -> MatchMap {
    let trees = tree.flatten();
    if trees.len() == 1 {
        return highlight_tree(tree);
    }

    let partials: Vec<MatchMap> = std::thread::scope(|s| {
        let handles: Vec<_> = trees
            .iter()
            .map(|t| s.spawn(move || highlight_tree(t)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|p| std::panic::resume_unwind(p)))
            .collect()
    });

    let mut out = MatchMap::new();
    for partial in partials {
        out.merge(partial);
    }
    out
}

/// Highlight a single tree, ignoring its sub-trees.
pub fn highlight_tree(tree: &SyntaxTree) -> MatchMap {
    let mut out = MatchMap::new();
    let Some(query) = tree.language().highlights() else {
        return out;
    };
    let source = tree.source();
    let bytes = source.as_bytes();

    let mut scopes = vec![LocalScope::root()];
    let mut last_node = None;
    let mut pending_def: Option<(usize, usize)> = None;
    let mut reference: Option<String> = None;

    let mut cursor = QueryCursor::new();
    let mut captures = cursor.captures(&query.query, tree.root_node(), bytes);
    while let Some((m, ix)) = captures.next() {
        let capture = m.captures[*ix];
        let node = capture.node;
        let (start_byte, end_byte) = (node.start_byte(), node.end_byte());

        // the root scope ends at usize::MAX and is never popped
        scopes.retain(|s| s.end_byte > start_byte);

        if last_node != Some((start_byte, end_byte)) {
            last_node = Some((start_byte, end_byte));
            pending_def = None;
            reference = None;
        }

        let index = Some(capture.index);
        if m.pattern_index < query.threshold {
            if index == query.scope {
                scopes.push(LocalScope {
                    inherits: query.scope_inherits(m.pattern_index),
                    end_byte,
                    defs: Vec::new(),
                });
            } else if index == query.definition {
                let name = node.utf8_text(bytes).unwrap_or_default().to_string();
                let scope_ix = scopes.len() - 1;
                if let Some(scope) = scopes.last_mut() {
                    scope.defs.push(LocalDef { name, kind: None });
                    pending_def = Some((scope_ix, scope.defs.len() - 1));
                }
            } else if index == query.reference && pending_def.is_none() {
                let name = node.utf8_text(bytes).unwrap_or_default();
                reference = resolve_reference(&scopes, name);
            }
            continue;
        }

        let kind = query.capture_name(capture.index).to_string();
        if let Some((scope_ix, def_ix)) = pending_def.take() {
            if let Some(def) = scopes
                .get_mut(scope_ix)
                .and_then(|s| s.defs.get_mut(def_ix))
            {
                def.kind = Some(kind.clone());
            }
        }

        out.insert(Match {
            range: Range::new(
                source.position(node.start_position()),
                source.position(node.end_position()),
            ),
            kind,
            reference_type: reference.clone().unwrap_or_default(),
            priority: query.priority(m.pattern_index),
            source: tree.name().to_string(),
        });
    }
    out
}

/// Innermost-first lookup of a typed definition named `name`, stopping after the first
/// scope that does not inherit from its parent.
fn resolve_reference(scopes: &[LocalScope], name: &str) -> Option<String> {
    for scope in scopes.iter().rev() {
        let found = scope
            .defs
            .iter()
            .rev()
            .find(|d| d.name == name && d.kind.is_some());
        if let Some(def) = found {
            return def.kind.clone();
        }
        if !scope.inherits {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn m(range: Range, kind: &str, priority: i32) -> Match {
        Match {
            range,
            kind: kind.to_string(),
            reference_type: String::new(),
            priority,
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_multiline_match_recorded_on_every_row() {
        let mut map = MatchMap::new();
        map.insert(m(Range::from_coords(1, 4, 3, 2), "comment", 100));
        map.insert(m(Range::from_coords(5, 0, 6, 0), "string", 100));

        assert!(map.line(0).is_empty());
        assert_eq!(map.line(1).len(), 1);
        assert_eq!(map.line(2).len(), 1);
        assert_eq!(map.line(3).len(), 1);
        assert_eq!(map.line(5).len(), 1);
        assert!(map.line(6).is_empty());
        assert_eq!(map.rows().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_style_at_prefers_priority_then_latest() {
        let mut map = MatchMap::new();
        map.insert(m(Range::from_coords(0, 0, 0, 10), "variable", 100));
        map.insert(m(Range::from_coords(0, 0, 0, 4), "keyword", 100));
        map.insert(m(Range::from_coords(0, 2, 0, 6), "constant", 90));

        assert_eq!(map.style_at(Position::new(0, 1)).unwrap().kind, "keyword");
        assert_eq!(map.style_at(Position::new(0, 5)).unwrap().kind, "variable");
        assert_eq!(map.style_at(Position::new(0, 8)).unwrap().kind, "variable");
        assert!(map.style_at(Position::new(0, 10)).is_none());

        let mut urgent = MatchMap::new();
        urgent.insert(m(Range::from_coords(0, 0, 0, 2), "error", 200));
        map.merge(urgent);
        assert_eq!(map.style_at(Position::new(0, 1)).unwrap().kind, "error");
    }

    #[test]
    fn test_reference_lookup_stops_at_non_inheriting_scope() {
        let def = |name: &str, kind: &str| LocalDef {
            name: name.to_string(),
            kind: Some(kind.to_string()),
        };
        let scopes = vec![
            LocalScope {
                inherits: false,
                end_byte: usize::MAX,
                defs: vec![def("a", "outer")],
            },
            LocalScope {
                inherits: false,
                end_byte: 50,
                defs: vec![def("b", "function"), LocalDef { name: "c".into(), kind: None }],
            },
            LocalScope {
                inherits: true,
                end_byte: 40,
                defs: vec![def("b", "parameter")],
            },
        ];
        assert_eq!(resolve_reference(&scopes, "b").as_deref(), Some("parameter"));
        assert_eq!(resolve_reference(&scopes, "a"), None);
        assert_eq!(resolve_reference(&scopes, "c"), None);
        assert_eq!(resolve_reference(&scopes[..1], "a").as_deref(), Some("outer"));
    }
}
