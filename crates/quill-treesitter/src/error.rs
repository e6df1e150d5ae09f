use std::time::Duration;

/// Errors produced by the syntax engine.
///
/// Syntax errors in user content are not errors here; they become diagnostics (see
/// [`validate`](crate::validate)).
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// Setting the Tree-sitter language failed (usually an ABI version mismatch).
    #[error("tree-sitter language error for {language}: {message}")]
    Language {
        /// Language name.
        language: String,
        /// Underlying error text.
        message: String,
    },
    /// Compiling a query failed, or it lacks a required capture.
    #[error("invalid {kind} query for {language}: {message}")]
    Query {
        /// Language name.
        language: String,
        /// Which query (`highlights`, `injections`, `outline`).
        kind: &'static str,
        /// Underlying error text.
        message: String,
    },
    /// A query was attached to a language that has no grammar.
    #[error("language {0} has no grammar")]
    NoGrammar(String),
    /// A file-name pattern failed to compile.
    #[error("invalid file pattern: {0}")]
    FilePattern(#[from] regex::Error),
    /// The parser rejected the included ranges for an injected language.
    #[error("invalid included ranges for {language}: {message}")]
    IncludedRanges {
        /// Injected language name.
        language: String,
        /// Underlying error text.
        message: String,
    },
    /// Parsing exceeded the configured timeout; the previous tree is kept.
    #[error("parsing {language} exceeded {timeout:?}")]
    Timeout {
        /// Language name.
        language: String,
        /// Configured limit.
        timeout: Duration,
    },
    /// The parser returned no tree.
    #[error("parsing {language} failed")]
    ParseFailed {
        /// Language name.
        language: String,
    },
}
