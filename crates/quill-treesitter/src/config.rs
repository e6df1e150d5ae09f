use std::time::Duration;

/// Default limit for a single parse call.
pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default cap on nested injections (an injected language injecting another, ...).
pub const DEFAULT_MAX_INJECTION_DEPTH: usize = 4;

/// Configuration for [`DocumentSyntax`](crate::DocumentSyntax).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxConfig {
    /// A parse call running longer than this is abandoned.
    pub parse_timeout: Duration,
    /// Injections nested deeper than this are not parsed.
    pub max_injection_depth: usize,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            parse_timeout: DEFAULT_PARSE_TIMEOUT,
            max_injection_depth: DEFAULT_MAX_INJECTION_DEPTH,
        }
    }
}

impl SyntaxConfig {
    /// Set the parse timeout.
    pub fn with_parse_timeout(mut self, timeout: Duration) -> Self {
        self.parse_timeout = timeout;
        self
    }

    /// Set the injection depth cap. `0` disables injections.
    pub fn with_max_injection_depth(mut self, depth: usize) -> Self {
        self.max_injection_depth = depth;
        self
    }
}
