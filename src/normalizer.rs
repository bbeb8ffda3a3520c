//! Text normalization for extracted book content.
//!
//! Extractors hand back whatever the source format contained: mixed line
//! endings, decorative control characters, runs of spaces left over from
//! column layouts. Everything downstream (pagination, offsets, snippets)
//! assumes one canonical form, so all text passes through here exactly once
//! before it is paginated or persisted.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static RE_HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

/// Canonicalize raw extracted text.
///
/// - all line-ending variants become `\n`
/// - three or more consecutive newlines collapse to exactly two (one
///   paragraph break)
/// - runs of intra-line whitespace collapse to a single space
/// - control characters other than tab/newline are stripped
///
/// Total and idempotent: any input string yields a string, and running the
/// result through again changes nothing.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

    text.retain(|ch| ch == '\n' || ch == '\t' || !ch.is_control());

    let text = RE_HORIZONTAL_WS.replace_all(&text, " ");

    // Trailing spaces before a newline would make section offsets depend on
    // invisible characters, and a "blank" line holding a single space would
    // hide a paragraph break from the newline collapse below. Trim line ends
    // first so the break collapse sees real newline runs.
    let mut trimmed = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            trimmed.push('\n');
        }
        trimmed.push_str(line.trim_end());
    }

    let text = RE_EXCESS_NEWLINES.replace_all(&trimmed, "\n\n");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unifies_line_endings() {
        assert_eq!(normalize("one\r\ntwo\rthree\nfour"), "one\ntwo\nthree\nfour");
    }

    #[test]
    fn collapses_excess_newlines_to_paragraph_break() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn collapses_intra_line_whitespace_without_touching_newlines() {
        assert_eq!(normalize("a   b\tc\nd  e"), "a b c\nd e");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(normalize("a\u{0000}b\u{0008}c"), "abc");
        // Tab survives as whitespace, newline survives as structure.
        assert_eq!(normalize("a\tb\nc"), "a b\nc");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\n  "), "");
    }

    #[test]
    fn blank_lines_holding_spaces_still_collapse() {
        assert_eq!(normalize("a\n \n \nb"), "a\n\nb");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "Hello\r\n\r\n\r\nworld   again",
            "  padded  \n\n\n text \t here ",
            "plain",
            "",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
