//! Compiled queries and the capture ids / per-pattern properties the engine relies on.

use crate::error::SyntaxError;
use tree_sitter::{Language, Query};

/// Priority of a highlight match without a `priority` property.
pub const DEFAULT_PRIORITY: i32 = 100;

fn compile(
    language: &Language,
    language_name: &str,
    kind: &'static str,
    source: &str,
) -> Result<Query, SyntaxError> {
    Query::new(language, source).map_err(|e| SyntaxError::Query {
        language: language_name.to_string(),
        kind,
        message: e.to_string(),
    })
}

fn capture(query: &Query, name: &str) -> Option<u32> {
    query.capture_index_for_name(name)
}

fn property<'q>(query: &'q Query, pattern: usize, key: &str) -> Option<Option<&'q str>> {
    query
        .property_settings(pattern)
        .iter()
        .find(|p| p.key.as_ref() == key)
        .map(|p| p.value.as_deref())
}

/// A highlight query with its locals patterns in front.
///
/// The locals source and the highlights source are compiled as one query. Patterns that
/// start inside the locals source are local-scoping patterns, everything after them styles.
#[derive(Debug)]
pub struct HighlightQuery {
    pub(crate) query: Query,
    pub(crate) threshold: usize,
    pub(crate) scope: Option<u32>,
    pub(crate) definition: Option<u32>,
    pub(crate) reference: Option<u32>,
    pub(crate) priorities: Vec<i32>,
    pub(crate) inherits: Vec<bool>,
}

impl HighlightQuery {
    /// Compile `locals` followed by `highlights` (either may be empty).
    pub fn new(
        language: &Language,
        language_name: &str,
        locals: &str,
        highlights: &str,
    ) -> Result<Self, SyntaxError> {
        let source = format!("{locals}\n{highlights}");
        let query = compile(language, language_name, "highlights", &source)?;

        let threshold = (0..query.pattern_count())
            .take_while(|i| query.start_byte_for_pattern(*i) < locals.len())
            .count();
        let priorities = (0..query.pattern_count())
            .map(|i| {
                property(&query, i, "priority")
                    .flatten()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PRIORITY)
            })
            .collect();
        let inherits = (0..query.pattern_count())
            .map(|i| property(&query, i, "local.scope-inherits").flatten() != Some("false"))
            .collect();

        Ok(Self {
            scope: capture(&query, "local.scope"),
            definition: capture(&query, "local.definition"),
            reference: capture(&query, "local.reference"),
            threshold,
            priorities,
            inherits,
            query,
        })
    }

    /// Index of the first styling pattern.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The compiled query.
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub(crate) fn capture_name(&self, index: u32) -> &str {
        self.query
            .capture_names()
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn priority(&self, pattern: usize) -> i32 {
        self.priorities.get(pattern).copied().unwrap_or(DEFAULT_PRIORITY)
    }

    pub(crate) fn scope_inherits(&self, pattern: usize) -> bool {
        self.inherits.get(pattern).copied().unwrap_or(true)
    }
}

/// How an injection pattern names its target language, from `#set!` properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InjectionSettings {
    pub(crate) language: Option<String>,
    pub(crate) filename: Option<String>,
    pub(crate) mimetype: Option<String>,
    pub(crate) parent: bool,
}

/// An injections query (`@injection.content` plus optional name captures).
#[derive(Debug)]
pub struct InjectionQuery {
    pub(crate) query: Query,
    pub(crate) content: u32,
    pub(crate) language: Option<u32>,
    pub(crate) filename: Option<u32>,
    pub(crate) mimetype: Option<u32>,
    pub(crate) settings: Vec<InjectionSettings>,
}

impl InjectionQuery {
    /// Compile an injections query. It must capture `@injection.content`.
    pub fn new(
        language: &Language,
        language_name: &str,
        source: &str,
    ) -> Result<Self, SyntaxError> {
        let query = compile(language, language_name, "injections", source)?;
        let content = capture(&query, "injection.content").ok_or_else(|| SyntaxError::Query {
            language: language_name.to_string(),
            kind: "injections",
            message: "missing @injection.content capture".to_string(),
        })?;

        let owned = |v: Option<Option<&str>>| v.flatten().map(str::to_string);
        let settings = (0..query.pattern_count())
            .map(|i| InjectionSettings {
                language: owned(property(&query, i, "injection.language")),
                filename: owned(property(&query, i, "injection.filename")),
                mimetype: owned(property(&query, i, "injection.mimetype")),
                parent: property(&query, i, "injection.parent").is_some(),
            })
            .collect();

        Ok(Self {
            content,
            language: capture(&query, "injection.language"),
            filename: capture(&query, "injection.filename"),
            mimetype: capture(&query, "injection.mimetype"),
            settings,
            query,
        })
    }

    pub(crate) fn settings(&self, pattern: usize) -> InjectionSettings {
        self.settings.get(pattern).cloned().unwrap_or_default()
    }
}

/// An outline query (`@item`, `@name`, `@context`, `@context.extra`).
#[derive(Debug)]
pub struct OutlineQuery {
    pub(crate) query: Query,
    pub(crate) item: u32,
    pub(crate) name: Option<u32>,
    pub(crate) context: Option<u32>,
    pub(crate) extra: Option<u32>,
}

impl OutlineQuery {
    /// Compile an outline query. It must capture `@item`.
    pub fn new(
        language: &Language,
        language_name: &str,
        source: &str,
    ) -> Result<Self, SyntaxError> {
        let query = compile(language, language_name, "outline", source)?;
        let item = capture(&query, "item").ok_or_else(|| SyntaxError::Query {
            language: language_name.to_string(),
            kind: "outline",
            message: "missing @item capture".to_string(),
        })?;
        Ok(Self {
            item,
            name: capture(&query, "name"),
            context: capture(&query, "context"),
            extra: capture(&query, "context.extra"),
            query,
        })
    }
}
