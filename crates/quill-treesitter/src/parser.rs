use crate::config::SyntaxConfig;
use crate::error::SyntaxError;
use crate::query::InjectionQuery;
use crate::registry::{LanguageConfig, LanguageRegistry};
use crate::source::SourceText;
use crate::tree::SyntaxTree;
use quill_core::{Buffer, ByteEdit};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, ParseOptions, ParseState, Parser, QueryCursor, Tree};

/// How [`DocumentSyntax`] produced its current tree on the last call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// First parse since the language was set.
    Initial,
    /// Reparsed with the edited previous tree as a reuse hint.
    Incremental,
    /// Reparsed from scratch (missed edits, or recovering from a failed parse).
    FullReparse,
    /// No work was performed (no grammar, or this buffer version is already parsed).
    Skipped,
}

/// The syntax state of one document.
///
/// Starts without a tree; [`DocumentSyntax::init_tree`] parses the whole buffer and
/// [`DocumentSyntax::update_tree`] reparses incrementally after each edit. Changing the
/// language drops the tree.
pub struct DocumentSyntax {
    registry: Arc<LanguageRegistry>,
    config: SyntaxConfig,
    language: Option<Arc<LanguageConfig>>,
    parser: Parser,
    tree: Option<SyntaxTree>,
    parsed_version: Option<u64>,
    needs_full_reparse: bool,
    last_update_mode: UpdateMode,
}

impl DocumentSyntax {
    /// Create syntax state resolving injected languages through `registry`.
    pub fn new(registry: Arc<LanguageRegistry>, config: SyntaxConfig) -> Self {
        Self {
            registry,
            config,
            language: None,
            parser: Parser::new(),
            tree: None,
            parsed_version: None,
            needs_full_reparse: false,
            last_update_mode: UpdateMode::Skipped,
        }
    }

    /// The current configuration.
    pub fn config(&self) -> &SyntaxConfig {
        &self.config
    }

    /// Change the parse timeout for subsequent parses.
    pub fn set_parse_timeout(&mut self, timeout: Duration) {
        self.config.parse_timeout = timeout;
    }

    /// The document language, if set.
    pub fn language(&self) -> Option<&Arc<LanguageConfig>> {
        self.language.as_ref()
    }

    /// Set the document language and drop the current tree.
    pub fn set_language(&mut self, language: Option<Arc<LanguageConfig>>) {
        tracing::debug!(
            language = language.as_ref().map(|l| l.name()),
            "document language changed"
        );
        self.language = language;
        self.reset();
    }

    /// Set the language from the registry by file name. Returns the language found.
    pub fn set_language_for_path(&mut self, path: &str) -> Option<Arc<LanguageConfig>> {
        let language = self.registry.by_filename(path);
        self.set_language(language.clone());
        language
    }

    /// The current tree, if the document has been parsed.
    pub fn tree(&self) -> Option<&SyntaxTree> {
        self.tree.as_ref()
    }

    /// A cheap copy of the current tree for background analysis.
    pub fn snapshot(&self) -> Option<SyntaxTree> {
        self.tree.clone()
    }

    /// Buffer version the current tree was parsed from.
    pub fn parsed_version(&self) -> Option<u64> {
        self.parsed_version
    }

    /// How the last `init_tree` / `update_tree` call produced the tree.
    pub fn last_update_mode(&self) -> UpdateMode {
        self.last_update_mode
    }

    fn reset(&mut self) {
        self.tree = None;
        self.parsed_version = None;
        self.needs_full_reparse = false;
    }

    /// Parse the whole buffer.
    ///
    /// A language without a grammar leaves the document without a tree. On failure the
    /// previous tree is kept.
    pub fn init_tree(&mut self, buffer: &Buffer) -> Result<UpdateMode, SyntaxError> {
        let Some(language) = self.grammar_language() else {
            self.reset();
            return Ok(self.finish(UpdateMode::Skipped));
        };
        let mode = if self.tree.is_some() {
            UpdateMode::FullReparse
        } else {
            UpdateMode::Initial
        };
        self.parse_document(language, buffer, None, mode)
    }

    /// Apply `edit` (the most recent mutation of `buffer`) and reparse.
    ///
    /// Falls back to a full parse when there is no tree yet, when edits were missed, or after
    /// a failed parse. On failure (including timeout) the previous tree is kept and the next
    /// update performs a full parse.
    pub fn update_tree(
        &mut self,
        buffer: &Buffer,
        edit: &ByteEdit,
    ) -> Result<UpdateMode, SyntaxError> {
        let Some(language) = self.grammar_language() else {
            return Ok(self.finish(UpdateMode::Skipped));
        };
        if self.parsed_version == Some(buffer.version()) {
            return Ok(self.finish(UpdateMode::Skipped));
        }

        let contiguous = self
            .parsed_version
            .is_some_and(|v| v + 1 == buffer.version());
        let mode = match &self.tree {
            None => UpdateMode::Initial,
            Some(_) if self.needs_full_reparse || !contiguous => UpdateMode::FullReparse,
            Some(_) => UpdateMode::Incremental,
        };

        let hint = match (&self.tree, mode) {
            (Some(tree), UpdateMode::Incremental) => {
                tracing::trace!(
                    start = edit.start_byte,
                    old_end = edit.old_end_byte,
                    new_end = edit.new_end_byte,
                    "incremental reparse"
                );
                let mut hint = tree.clone();
                hint.edit(edit);
                Some(hint)
            }
            _ => {
                tracing::debug!(
                    parsed = ?self.parsed_version,
                    version = buffer.version(),
                    mode = ?mode,
                    "reparsing whole document"
                );
                None
            }
        };
        self.parse_document(language, buffer, hint, mode)
    }

    fn grammar_language(&self) -> Option<Arc<LanguageConfig>> {
        self.language
            .as_ref()
            .filter(|l| l.grammar().is_some())
            .cloned()
    }

    fn finish(&mut self, mode: UpdateMode) -> UpdateMode {
        self.last_update_mode = mode;
        mode
    }

    fn parse_document(
        &mut self,
        language: Arc<LanguageConfig>,
        buffer: &Buffer,
        hint: Option<SyntaxTree>,
        mode: UpdateMode,
    ) -> Result<UpdateMode, SyntaxError> {
        let source = Arc::new(SourceText::from_buffer(buffer));
        let started = Instant::now();
        let mut ctx = ParseContext {
            parser: &mut self.parser,
            registry: &self.registry,
            config: self.config,
            source: &source,
        };

        match ctx.parse_tree(language, Vec::new(), hint.as_ref(), 0) {
            Ok(tree) => {
                tracing::debug!(
                    language = tree.name(),
                    mode = ?mode,
                    sub_trees = tree.sub_trees().len(),
                    elapsed = ?started.elapsed(),
                    "parsed document"
                );
                self.tree = Some(tree);
                self.parsed_version = Some(buffer.version());
                self.needs_full_reparse = false;
                Ok(self.finish(mode))
            }
            Err(err) => {
                if let SyntaxError::Timeout { .. } = &err {
                    tracing::warn!(%err, "keeping previous syntax tree");
                }
                self.needs_full_reparse = true;
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for DocumentSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSyntax")
            .field("language", &self.language.as_ref().map(|l| l.name()))
            .field("config", &self.config)
            .field("parsed_version", &self.parsed_version)
            .field("last_update_mode", &self.last_update_mode)
            .finish_non_exhaustive()
    }
}

struct ParseContext<'a> {
    parser: &'a mut Parser,
    registry: &'a LanguageRegistry,
    config: SyntaxConfig,
    source: &'a Arc<SourceText>,
}

impl ParseContext<'_> {
    /// Parse `ranges` of the document (all of it when empty) as `language`, then the
    /// languages injected into the result.
    fn parse_tree(
        &mut self,
        language: Arc<LanguageConfig>,
        ranges: Vec<tree_sitter::Range>,
        old: Option<&SyntaxTree>,
        depth: usize,
    ) -> Result<SyntaxTree, SyntaxError> {
        let Some(grammar) = language.grammar() else {
            return Err(SyntaxError::NoGrammar(language.name().to_string()));
        };
        self.parser
            .set_language(grammar.language())
            .map_err(|e| SyntaxError::Language {
                language: language.name().to_string(),
                message: e.to_string(),
            })?;
        self.parser
            .set_included_ranges(&ranges)
            .map_err(|e| SyntaxError::IncludedRanges {
                language: language.name().to_string(),
                message: format!("{e:?}"),
            })?;

        let tree = self.parse_with_timeout(language.name(), old.map(SyntaxTree::tree))?;

        let mut sub_trees = BTreeMap::new();
        if let Some(injections) = grammar.injections() {
            if depth < self.config.max_injection_depth {
                let regions = self.collect_injections(injections, &tree, &language);
                for (name, (sub_language, sub_ranges)) in regions {
                    if name == language.name()
                        && same_spans(&sub_ranges, &ranges, self.source.len())
                    {
                        tracing::debug!(
                            language = %name,
                            depth,
                            "skipping injection of a tree into itself"
                        );
                        continue;
                    }
                    let old_sub = old.and_then(|o| o.sub_tree(&name));
                    tracing::debug!(
                        parent = language.name(),
                        language = %name,
                        regions = sub_ranges.len(),
                        reuse = old_sub.is_some(),
                        "parsing injection"
                    );
                    let sub = self.parse_tree(sub_language, sub_ranges, old_sub, depth + 1)?;
                    sub_trees.insert(name, sub);
                }
            } else {
                tracing::debug!(
                    language = language.name(),
                    depth,
                    "injection depth limit reached"
                );
            }
        }

        Ok(SyntaxTree::new(
            language,
            tree,
            Arc::clone(self.source),
            ranges,
            sub_trees,
        ))
    }

    fn parse_with_timeout(
        &mut self,
        language: &str,
        old: Option<&Tree>,
    ) -> Result<Tree, SyntaxError> {
        let bytes = self.source.as_bytes();
        let timeout = self.config.parse_timeout;
        let started = Instant::now();
        let mut progress = |_: &ParseState| started.elapsed() >= timeout;
        let options = ParseOptions::new().progress_callback(&mut progress);

        let tree = self.parser.parse_with_options(
            &mut |offset: usize, _: tree_sitter::Point| bytes.get(offset..).unwrap_or_default(),
            old,
            Some(options),
        );

        match tree {
            Some(tree) => Ok(tree),
            None => {
                self.parser.reset();
                if started.elapsed() >= timeout {
                    Err(SyntaxError::Timeout {
                        language: language.to_string(),
                        timeout,
                    })
                } else {
                    Err(SyntaxError::ParseFailed {
                        language: language.to_string(),
                    })
                }
            }
        }
    }

    /// Run the injections query and group content ranges by resolved language.
    fn collect_injections(
        &self,
        injections: &InjectionQuery,
        tree: &Tree,
        parent: &Arc<LanguageConfig>,
    ) -> BTreeMap<String, (Arc<LanguageConfig>, Vec<tree_sitter::Range>)> {
        let bytes = self.source.as_bytes();
        let mut regions: BTreeMap<String, (Arc<LanguageConfig>, Vec<tree_sitter::Range>)> =
            BTreeMap::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&injections.query, tree.root_node(), bytes);
        while let Some(m) = matches.next() {
            let settings = injections.settings(m.pattern_index);
            let mut language_name = settings.language;
            let mut filename = settings.filename;
            let mut mimetype = settings.mimetype;
            let mut content = Vec::new();

            for capture in m.captures {
                let index = Some(capture.index);
                if capture.index == injections.content {
                    content.push(capture.node.range());
                } else if index == injections.language {
                    language_name = Some(node_text(capture.node, bytes));
                } else if index == injections.filename {
                    filename = Some(node_text(capture.node, bytes));
                } else if index == injections.mimetype {
                    mimetype = Some(node_text(capture.node, bytes));
                }
            }
            if content.is_empty() {
                continue;
            }

            let resolved = language_name
                .as_deref()
                .and_then(|name| self.registry.by_name(name))
                .or_else(|| filename.as_deref().and_then(|f| self.registry.by_filename(f)))
                .or_else(|| mimetype.as_deref().and_then(|m| self.registry.by_mime_type(m)))
                .or_else(|| settings.parent.then(|| Arc::clone(parent)));

            let Some(target) = resolved.filter(|l| l.grammar().is_some()) else {
                tracing::debug!(
                    language = ?language_name,
                    filename = ?filename,
                    mimetype = ?mimetype,
                    "no grammar for injection"
                );
                continue;
            };

            regions
                .entry(target.name().to_string())
                .or_insert_with(|| (Arc::clone(&target), Vec::new()))
                .1
                .extend(content);
        }

        for (_, ranges) in regions.values_mut() {
            normalize_ranges(ranges);
        }
        regions.retain(|_, (_, ranges)| !ranges.is_empty());
        regions
    }
}

fn node_text(node: Node<'_>, bytes: &[u8]) -> String {
    node.utf8_text(bytes).unwrap_or_default().trim().to_string()
}

/// Whether `injected` covers exactly the bytes of `current`; empty `current` stands for the
/// whole document of `len` bytes.
fn same_spans(
    injected: &[tree_sitter::Range],
    current: &[tree_sitter::Range],
    len: usize,
) -> bool {
    let spans = |ranges: &[tree_sitter::Range]| -> Vec<(usize, usize)> {
        ranges.iter().map(|r| (r.start_byte, r.end_byte)).collect()
    };
    if current.is_empty() {
        return spans(injected) == [(0, len)];
    }
    spans(injected) == spans(current)
}

/// Sort ranges and drop empty or overlapping ones; the parser requires ordered, disjoint
/// included ranges.
fn normalize_ranges(ranges: &mut Vec<tree_sitter::Range>) {
    ranges.sort_by_key(|r| (r.start_byte, r.end_byte));
    let mut end = 0;
    ranges.retain(|r| {
        if r.start_byte >= r.end_byte || r.start_byte < end {
            return false;
        }
        end = r.end_byte;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Point;

    fn range(start: usize, end: usize) -> tree_sitter::Range {
        tree_sitter::Range {
            start_byte: start,
            end_byte: end,
            start_point: Point::new(0, start),
            end_point: Point::new(0, end),
        }
    }

    #[test]
    fn test_normalize_ranges_sorts_and_drops_overlaps() {
        let mut ranges = vec![
            range(10, 20),
            range(0, 5),
            range(15, 25),
            range(30, 30),
            range(20, 22),
        ];
        normalize_ranges(&mut ranges);
        let spans: Vec<_> = ranges.iter().map(|r| (r.start_byte, r.end_byte)).collect();
        assert_eq!(spans, vec![(0, 5), (10, 20), (20, 22)]);
    }

    #[test]
    fn test_same_spans_treats_empty_as_whole_document() {
        assert!(same_spans(&[range(0, 9)], &[], 9));
        assert!(!same_spans(&[range(0, 4)], &[], 9));
        assert!(same_spans(&[range(2, 4), range(6, 8)], &[range(2, 4), range(6, 8)], 9));
        assert!(!same_spans(&[range(2, 4)], &[range(2, 4), range(6, 8)], 9));
    }
}
