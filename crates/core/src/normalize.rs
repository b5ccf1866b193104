//! Text cleanup for extracted document text.
//!
//! Collapses runs of blank lines, replaces tabs and trims the result.

use regex::Regex;
use std::sync::LazyLock;

/// A newline, any whitespace (including further newlines), then a newline.
static BLANK_LINES_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Clean text extracted from a PDF, OCR pass, Word document or text file.
///
/// - Runs of blank lines become a single empty line (`"\n\n"`)
/// - Tabs become single spaces
/// - Leading/trailing whitespace is trimmed
pub fn clean_text(text: &str) -> String {
    let collapsed = BLANK_LINES_REGEX.replace_all(text, "\n\n");
    collapsed.replace('\t', " ").trim().to_string()
}

/// Decode raw text bytes as UTF-8, falling back to Latin-1.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            log::debug!("Text is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(clean_text("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_text("a\n   \n \t\nb"), "a\n\nb");
    }

    #[test]
    fn test_single_newline_untouched() {
        assert_eq!(clean_text("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_tabs_become_spaces() {
        assert_eq!(clean_text("col1\tcol2"), "col1 col2");
    }

    #[test]
    fn test_trim() {
        assert_eq!(clean_text("\n\n  Hello  \n\n"), "Hello");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // 0xE9 is 'é' in Latin-1 and invalid as a lone UTF-8 byte.
        assert_eq!(decode_text(&[b'c', b'a', b'f', 0xE9]), "café");
    }
}
