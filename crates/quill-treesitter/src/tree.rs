use crate::registry::LanguageConfig;
use crate::source::SourceText;
use quill_core::{ByteEdit, Position};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tree_sitter::{InputEdit, Node, Point, Tree};

/// A parse tree for one language plus the trees of the languages injected into it.
///
/// Cloning is cheap: the Tree-sitter tree is reference counted and the source text is shared,
/// so a clone is a snapshot that can be handed to worker threads.
#[derive(Clone)]
pub struct SyntaxTree {
    language: Arc<LanguageConfig>,
    tree: Tree,
    source: Arc<SourceText>,
    ranges: Vec<tree_sitter::Range>,
    sub_trees: BTreeMap<String, SyntaxTree>,
}

impl SyntaxTree {
    pub(crate) fn new(
        language: Arc<LanguageConfig>,
        tree: Tree,
        source: Arc<SourceText>,
        ranges: Vec<tree_sitter::Range>,
        sub_trees: BTreeMap<String, SyntaxTree>,
    ) -> Self {
        Self {
            language,
            tree,
            source,
            ranges,
            sub_trees,
        }
    }

    /// The language this tree was parsed with.
    pub fn language(&self) -> &Arc<LanguageConfig> {
        &self.language
    }

    /// Language name (the sub-tree key).
    pub fn name(&self) -> &str {
        self.language.name()
    }

    /// The underlying Tree-sitter tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Root node of the underlying tree.
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Document text the tree was parsed from.
    pub fn source(&self) -> &SourceText {
        &self.source
    }

    /// Ranges this tree was restricted to. Empty for the document tree.
    pub fn included_ranges(&self) -> &[tree_sitter::Range] {
        &self.ranges
    }

    /// Trees of injected languages, keyed by language name.
    pub fn sub_trees(&self) -> &BTreeMap<String, SyntaxTree> {
        &self.sub_trees
    }

    /// The injected tree for `language`, if any.
    pub fn sub_tree(&self, language: &str) -> Option<&SyntaxTree> {
        self.sub_trees.get(language)
    }

    /// This tree followed by every nested sub-tree, depth first in key order.
    pub fn flatten(&self) -> Vec<&SyntaxTree> {
        let mut out = vec![self];
        for sub in self.sub_trees.values() {
            out.extend(sub.flatten());
        }
        out
    }

    /// Returns `true` if this tree or any sub-tree contains a syntax error.
    pub fn has_error(&self) -> bool {
        self.root_node().has_error() || self.sub_trees.values().any(SyntaxTree::has_error)
    }

    /// The most specific tree covering `position`; `self` if no sub-tree does.
    pub fn find(&self, position: Position) -> &SyntaxTree {
        let Some(byte) = self.source.byte_of(position) else {
            return self;
        };
        self.find_byte(byte)
    }

    fn find_byte(&self, byte: usize) -> &SyntaxTree {
        self.sub_trees
            .values()
            .find(|sub| sub.covers(byte))
            .map_or(self, |sub| sub.find_byte(byte))
    }

    fn covers(&self, byte: usize) -> bool {
        if self.ranges.is_empty() {
            let root = self.root_node();
            return root.start_byte() <= byte && byte < root.end_byte();
        }
        self.ranges
            .iter()
            .any(|r| r.start_byte <= byte && byte < r.end_byte)
    }

    /// Apply an edit to this tree and every sub-tree.
    pub fn edit(&mut self, edit: &ByteEdit) {
        let input = input_edit(edit);
        self.edit_input(&input);
    }

    fn edit_input(&mut self, input: &InputEdit) {
        self.tree.edit(input);
        for sub in self.sub_trees.values_mut() {
            sub.edit_input(input);
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}{}", self.name())?;
        if !self.ranges.is_empty() {
            let spans: Vec<String> = self
                .ranges
                .iter()
                .map(|r| format!("{}..{}", r.start_byte, r.end_byte))
                .collect();
            write!(f, " [{}]", spans.join(", "))?;
        }
        writeln!(f)?;
        writeln!(f, "{indent}  {}", self.root_node().to_sexp())?;
        for sub in self.sub_trees.values() {
            sub.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.name())
            .field("ranges", &self.ranges)
            .field("sub_trees", &self.sub_trees)
            .finish_non_exhaustive()
    }
}

pub(crate) fn input_edit(edit: &ByteEdit) -> InputEdit {
    let point = |p: quill_core::Point| Point::new(p.row, p.column);
    InputEdit {
        start_byte: edit.start_byte,
        old_end_byte: edit.old_end_byte,
        new_end_byte: edit.new_end_byte,
        start_position: point(edit.start_point),
        old_end_position: point(edit.old_end_point),
        new_end_position: point(edit.new_end_point),
    }
}
