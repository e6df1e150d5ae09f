//! Line ending helpers.
//!
//! A [`Buffer`](crate::Buffer) always joins its lines with LF in its canonical byte form.
//! The configured line ending only matters when bytes leave the buffer (saving, or
//! bytes-for-display).

/// The newline sequence used when writing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Not decided yet; resolved from the first terminated line on load.
    #[default]
    Auto,
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the line ending from the first terminated line of `bytes`.
    ///
    /// Policy: the first `'\n'` decides. If it is preceded by `'\r'` the result is
    /// [`LineEnding::Crlf`], otherwise (including input with no newline at all)
    /// [`LineEnding::Lf`].
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes.iter().position(|b| *b == b'\n') {
            Some(i) if i > 0 && bytes[i - 1] == b'\r' => Self::Crlf,
            _ => Self::Lf,
        }
    }

    /// Resolve [`LineEnding::Auto`] against `bytes`; explicit choices are kept.
    pub fn resolve(self, bytes: &[u8]) -> Self {
        match self {
            Self::Auto => Self::detect(bytes),
            explicit => explicit,
        }
    }

    /// The newline sequence. `Auto` writes LF.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto | Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// Parse a configuration name (`"lf"`, `"crlf"`, `"auto"`); unknown names map to `Auto`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "lf" | "unix" => Self::Lf,
            "crlf" | "dos" | "windows" => Self::Crlf,
            _ => Self::Auto,
        }
    }
}
