//! Text utilities shared by the renderers and the driver.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset="...">`)
/// 3. Falls back to Windows-1252 (what older Bible exports were saved as)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode an HTML source file, using its declared charset as the hint.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, extract_meta_charset(bytes))
}

/// Extract the encoding name from a `charset=` declaration in the document head.
///
/// Matches both `<meta charset="...">` and the older
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">` form.
/// Only the first kilobyte is inspected.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let mut rest = &prefix[pos + 8..];

    if let Some((&first, tail)) = rest.split_first()
        && (first == b'"' || first == b'\'')
    {
        rest = tail;
    }

    let end = rest
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'>' | b' ' | b'/'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    std::str::from_utf8(&rest[..end]).ok()
}

/// Collapse every run of whitespace to a single space and trim the ends.
///
/// The body pages are flattened this way before parsing, so that all line
/// structure in the output comes from markup, never from source formatting.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Replace non-breaking spaces with plain spaces.
pub fn replace_nbsp(text: &str) -> Cow<'_, str> {
    if text.contains('\u{a0}') {
        Cow::Owned(text.replace('\u{a0}', " "))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split text into owned lines (the currency of the line-oriented passes).
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_borrows() {
        let decoded = decode_text("Genesis 1:1".as_bytes(), None);
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "Genesis 1:1");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // 0x93 / 0x94 are curly quotes in CP1252 and invalid UTF-8
        let bytes = b"\x93Let there be light\x94";
        assert_eq!(decode_text(bytes, None), "\u{201c}Let there be light\u{201d}");
    }

    #[test]
    fn test_extract_meta_charset() {
        let html = br#"<html><head><meta charset="windows-1252"></head>"#;
        assert_eq!(extract_meta_charset(html), Some("windows-1252"));

        let legacy = br#"<meta http-equiv="Content-Type" content="text/html; charset=iso-8859-1">"#;
        assert_eq!(extract_meta_charset(legacy), Some("iso-8859-1"));

        assert_eq!(extract_meta_charset(b"<html></html>"), None);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  <p>In the\n\tbeginning</p>\r\n "),
            "<p>In the beginning</p>"
        );
    }

    #[test]
    fn test_replace_nbsp() {
        assert_eq!(replace_nbsp("a\u{a0}b"), "a b");
        assert!(matches!(replace_nbsp("ab"), Cow::Borrowed(_)));
    }
}
