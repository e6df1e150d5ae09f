//! Text encodings for reading and writing files.
//!
//! Lookup goes through `encoding_rs` labels (`"utf-8"`, `"latin1"`, `"shift_jis"`, …).
//! An unknown label is not an error: the buffer falls back to UTF-8.

use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

/// Resolve an encoding label, falling back to UTF-8 for empty or unknown labels.
pub fn resolve(label: &str) -> &'static Encoding {
    let label = label.trim();
    if label.is_empty() {
        return UTF_8;
    }
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) => encoding,
        None => {
            tracing::warn!(label, "unknown encoding, falling back to utf-8");
            UTF_8
        }
    }
}

/// Decode `bytes`, removing a BOM if present. Malformed sequences become U+FFFD.
pub fn decode<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "replaced malformed input while decoding");
    }
    text
}

/// Encode `text` for writing.
///
/// `encoding_rs` only encodes into ASCII-compatible encodings; UTF-16 labels write UTF-8.
pub fn encode<'a>(encoding: &'static Encoding, text: &'a str) -> Cow<'a, [u8]> {
    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors {
        tracing::debug!(encoding = used.name(), "unmappable characters written as references");
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        assert_eq!(resolve("definitely-not-an-encoding"), UTF_8);
        assert_eq!(resolve(""), UTF_8);
        assert_eq!(resolve("latin1").name(), "windows-1252");
    }

    #[test]
    fn test_decode_strips_bom() {
        let text = decode(UTF_8, b"\xEF\xBB\xBFhi");
        assert_eq!(text, "hi");
    }

    #[test]
    fn test_latin1_round_trip() {
        let enc = resolve("latin1");
        let bytes = encode(enc, "café");
        assert_eq!(bytes.as_ref(), b"caf\xE9");
        assert_eq!(decode(enc, &bytes), "café");
    }
}
