//! Text sanitising.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

fn control_chars() -> &'static Regex {
    static CONTROL: OnceLock<Regex> = OnceLock::new();
    CONTROL.get_or_init(|| {
        Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f\x7f]").expect("control character pattern is valid")
    })
}

/// Prepare text for insertion.
///
/// Normalises line endings to `\n`, removes control characters the remote
/// document would reject and applies NFC normalisation. Offsets are always
/// computed on the cleaned text.
pub fn clean_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = control_chars().replace_all(&text, "");
    text.nfc().collect()
}

/// Strip tabs at the start of every line, which the remote API consumes as
/// list nesting.
///
/// `line_start` tells whether `text` begins a line. Returns the stripped text
/// and whether whatever follows it begins a line.
pub fn strip_nesting_tabs(text: &str, line_start: bool) -> (String, bool) {
    let mut stripped = String::with_capacity(text.len());
    let mut at_start = line_start;
    for ch in text.chars() {
        if at_start && ch == '\t' {
            continue;
        }
        at_start = ch == '\n';
        stripped.push(ch);
    }
    (stripped, at_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings() {
        assert_eq!(clean_text("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_control_chars_removed() {
        assert_eq!(clean_text("a\u{0}b\u{7}c\u{1b}d\u{7f}"), "abcd");
        // tabs and newlines survive
        assert_eq!(clean_text("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn test_nfc() {
        let decomposed = "e\u{0301}";
        let cleaned = clean_text(decomposed);
        assert_eq!(cleaned, "\u{e9}");
        assert_eq!(cleaned.encode_utf16().count(), 1);
    }

    #[test]
    fn test_strip_nesting_tabs() {
        assert_eq!(strip_nesting_tabs("\t\titem\t", true), ("item\t".to_string(), false));
        assert_eq!(strip_nesting_tabs("\titem", false), ("\titem".to_string(), false));
    }

    #[test]
    fn test_strip_nesting_tabs_after_newlines() {
        let (text, next) = strip_nesting_tabs("one\n\ttwo\n\t\t", true);
        assert_eq!(text, "one\ntwo\n");
        assert!(next);
        assert_eq!(strip_nesting_tabs("", true), (String::new(), true));
    }
}
