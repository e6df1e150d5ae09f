//! Language definitions and the registry that resolves them.
//!
//! The registry is an explicit value owned by the host and handed to
//! [`DocumentSyntax`](crate::DocumentSyntax); there is no global language table.

use crate::error::SyntaxError;
use crate::query::{HighlightQuery, InjectionQuery, OutlineQuery};
use quill_lang::CommentConfig;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tree_sitter::Language;

/// A Tree-sitter grammar together with its compiled queries.
pub struct Grammar {
    language: Language,
    highlights: Option<HighlightQuery>,
    injections: Option<InjectionQuery>,
    outline: Option<OutlineQuery>,
}

impl Grammar {
    /// The Tree-sitter language handle.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Highlight query (with locals), if any.
    pub fn highlights(&self) -> Option<&HighlightQuery> {
        self.highlights.as_ref()
    }

    /// Injections query, if any.
    pub fn injections(&self) -> Option<&InjectionQuery> {
        self.injections.as_ref()
    }

    /// Outline query, if any.
    pub fn outline(&self) -> Option<&OutlineQuery> {
        self.outline.as_ref()
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("node_kinds", &self.language.node_kind_count())
            .field("highlights", &self.highlights.is_some())
            .field("injections", &self.injections.is_some())
            .field("outline", &self.outline.is_some())
            .finish()
    }
}

/// Everything the editor knows about one language.
///
/// A language without a grammar still has a name, file patterns and comment tokens; tree
/// features are simply disabled for it.
#[derive(Debug)]
pub struct LanguageConfig {
    name: String,
    aliases: Vec<String>,
    file_patterns: Vec<Regex>,
    mime_types: Vec<String>,
    comment: CommentConfig,
    grammar: Option<Grammar>,
}

impl LanguageConfig {
    /// Create a language with no grammar.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            file_patterns: Vec::new(),
            mime_types: Vec::new(),
            comment: CommentConfig::default(),
            grammar: None,
        }
    }

    /// Attach a Tree-sitter grammar. Previously attached queries are dropped.
    pub fn with_grammar(mut self, language: impl Into<Language>) -> Self {
        self.grammar = Some(Grammar {
            language: language.into(),
            highlights: None,
            injections: None,
            outline: None,
        });
        self
    }

    /// Compile and attach the highlight query (`locals` patterns first).
    pub fn with_highlights(mut self, locals: &str, highlights: &str) -> Result<Self, SyntaxError> {
        let name = self.name.clone();
        let grammar = self.grammar_mut()?;
        grammar.highlights = Some(HighlightQuery::new(
            &grammar.language,
            &name,
            locals,
            highlights,
        )?);
        Ok(self)
    }

    /// Compile and attach the injections query.
    pub fn with_injections(mut self, source: &str) -> Result<Self, SyntaxError> {
        let name = self.name.clone();
        let grammar = self.grammar_mut()?;
        grammar.injections = Some(InjectionQuery::new(&grammar.language, &name, source)?);
        Ok(self)
    }

    /// Compile and attach the outline query.
    pub fn with_outline(mut self, source: &str) -> Result<Self, SyntaxError> {
        let name = self.name.clone();
        let grammar = self.grammar_mut()?;
        grammar.outline = Some(OutlineQuery::new(&grammar.language, &name, source)?);
        Ok(self)
    }

    /// Add a file-name pattern (a regex matched against the file name).
    pub fn with_file_pattern(mut self, pattern: &str) -> Result<Self, SyntaxError> {
        self.file_patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Add a MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_types.push(mime_type.into());
        self
    }

    /// Add an alternative name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the comment tokens.
    pub fn with_comment(mut self, comment: CommentConfig) -> Self {
        self.comment = comment;
        self
    }

    fn grammar_mut(&mut self) -> Result<&mut Grammar, SyntaxError> {
        let name = &self.name;
        self.grammar
            .as_mut()
            .ok_or_else(|| SyntaxError::NoGrammar(name.clone()))
    }

    /// Canonical name, used as the sub-tree key and as the match source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comment tokens.
    pub fn comment(&self) -> &CommentConfig {
        &self.comment
    }

    /// The grammar, if one is attached.
    pub fn grammar(&self) -> Option<&Grammar> {
        self.grammar.as_ref()
    }

    /// Highlight query, if the language has one.
    pub fn highlights(&self) -> Option<&HighlightQuery> {
        self.grammar.as_ref().and_then(Grammar::highlights)
    }

    /// Returns `true` if `name` is the name or an alias (case-insensitive).
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if a file-name pattern matches `file_name`.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        self.file_patterns.iter().any(|p| p.is_match(file_name))
    }

    /// Returns `true` if `mime_type` is one of the language's MIME types.
    pub fn matches_mime_type(&self, mime_type: &str) -> bool {
        self.mime_types.iter().any(|m| m.eq_ignore_ascii_case(mime_type))
    }
}

/// The set of languages available to the syntax engine.
#[derive(Debug, Default, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Arc<LanguageConfig>>,
}

impl LanguageRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a language. Later registrations do not shadow earlier ones with the same name.
    pub fn register(&mut self, language: LanguageConfig) -> Arc<LanguageConfig> {
        let language = Arc::new(language);
        tracing::debug!(
            language = language.name(),
            grammar = language.grammar().is_some(),
            "registered language"
        );
        self.languages.push(Arc::clone(&language));
        language
    }

    /// Builder form of [`LanguageRegistry::register`].
    pub fn with(mut self, language: LanguageConfig) -> Self {
        self.register(language);
        self
    }

    /// All registered languages, in registration order.
    pub fn languages(&self) -> &[Arc<LanguageConfig>] {
        &self.languages
    }

    /// Look up by name or alias.
    pub fn by_name(&self, name: &str) -> Option<Arc<LanguageConfig>> {
        let name = name.trim();
        self.find(|l| l.is_named(name))
    }

    /// Look up by file name (or path; only the final component is matched).
    pub fn by_filename(&self, path: &str) -> Option<Arc<LanguageConfig>> {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        self.find(|l| l.matches_file_name(file_name))
    }

    /// Look up by MIME type.
    pub fn by_mime_type(&self, mime_type: &str) -> Option<Arc<LanguageConfig>> {
        self.find(|l| l.matches_mime_type(mime_type.trim()))
    }

    fn find(&self, pred: impl Fn(&LanguageConfig) -> bool) -> Option<Arc<LanguageConfig>> {
        self.languages.iter().find(|l| pred(l)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LanguageRegistry {
        LanguageRegistry::new()
            .with(
                LanguageConfig::new("rust")
                    .with_grammar(tree_sitter_rust::LANGUAGE)
                    .with_file_pattern(r"\.rs$")
                    .unwrap()
                    .with_mime_type("text/rust")
                    .with_comment(CommentConfig::line("//")),
            )
            .with(
                LanguageConfig::new("javascript")
                    .with_alias("js")
                    .with_file_pattern(r"\.m?js$")
                    .unwrap(),
            )
    }

    #[test]
    fn test_lookup_by_name_alias_file_and_mime() {
        let registry = registry();
        assert_eq!(registry.by_name("Rust").unwrap().name(), "rust");
        assert_eq!(registry.by_name("JS").unwrap().name(), "javascript");
        assert_eq!(registry.by_filename("src/main.rs").unwrap().name(), "rust");
        assert_eq!(registry.by_filename("C:\\x\\app.mjs").unwrap().name(), "javascript");
        assert_eq!(registry.by_mime_type("text/rust").unwrap().name(), "rust");
        assert!(registry.by_name("cobol").is_none());
        assert!(registry.by_filename("main.rs.bak").is_none());
    }

    #[test]
    fn test_queries_require_a_grammar() {
        let err = LanguageConfig::new("plain").with_outline("(x) @item").unwrap_err();
        assert!(matches!(err, SyntaxError::NoGrammar(name) if name == "plain"));

        let err = LanguageConfig::new("bad").with_file_pattern("(").unwrap_err();
        assert!(matches!(err, SyntaxError::FilePattern(_)));
    }

    #[test]
    fn test_language_without_grammar_keeps_metadata() {
        let registry = registry();
        let js = registry.by_name("javascript").unwrap();
        assert!(js.grammar().is_none());
        assert!(js.highlights().is_none());
        assert!(registry.by_name("rust").unwrap().comment().has_line());
    }
}
