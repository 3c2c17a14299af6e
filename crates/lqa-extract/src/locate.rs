//! Balanced-bracket span location inside script text.
//!
//! A single forward scan with a signed depth counter, O(1) auxiliary
//! state. Bracket characters inside string literals are counted like any
//! other character — the embedded payloads this targets are JSON-like
//! arrays/objects whose string values do not contain bracket characters
//! in practice, and keeping the scanner literal-blind keeps it immune to
//! the half-escaped quoting styles those blobs ship with. Accepted
//! precision trade-off, not a bug.

use std::ops::Range;

/// Finds the first well-formed `open`…`close` span at or after
/// `search_from` (a byte offset) and returns its byte range.
///
/// Returns `None` when no `open` occurs at or after `search_from`, when
/// `search_from` is past the end of `text`, or when the span never closes
/// before end of input (truncated script content).
#[must_use]
pub fn locate(text: &str, open: char, close: char, search_from: usize) -> Option<Range<usize>> {
    let tail = text.get(search_from..)?;
    let start = search_from + tail.find(open)?;

    let mut depth: i64 = 0;
    for (i, c) in text[start..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(start..start + i + close.len_utf8());
            }
        }
    }
    None
}

/// [`locate`], returning the span itself.
#[must_use]
pub fn locate_slice(text: &str, open: char, close: char, search_from: usize) -> Option<&str> {
    locate(text, open, close, search_from).map(|range| &text[range])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_flat_array() {
        assert_eq!(locate_slice("x = [1, 2, 3]; y", '[', ']', 0), Some("[1, 2, 3]"));
    }

    #[test]
    fn finds_nested_array() {
        let text = r#"'initial': [{"a": [1, [2]]}, {"b": []}], 'other': [9]"#;
        assert_eq!(
            locate_slice(text, '[', ']', 0),
            Some(r#"[{"a": [1, [2]]}, {"b": []}]"#)
        );
    }

    #[test]
    fn respects_search_offset() {
        let text = "[skip me] [take me]";
        assert_eq!(locate_slice(text, '[', ']', 1), Some("[take me]"));
        assert_eq!(locate(text, '[', ']', 1), Some(10..19));
    }

    #[test]
    fn unterminated_span_is_none() {
        assert_eq!(locate_slice("data: [1, [2, 3]", '[', ']', 0), None);
    }

    #[test]
    fn absent_opener_is_none() {
        assert_eq!(locate_slice("no brackets here", '[', ']', 0), None);
        assert_eq!(locate_slice("[too late]", '[', ']', 15), None);
    }

    #[test]
    fn works_for_objects() {
        let text = r#"var cfg = {"a": {"b": 1}};"#;
        assert_eq!(locate_slice(text, '{', '}', 0), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn handles_multibyte_surroundings() {
        let text = "préfixe [\"café\"] suffixe";
        assert_eq!(locate_slice(text, '[', ']', 0), Some("[\"café\"]"));
    }

    #[test]
    fn brackets_inside_strings_are_counted() {
        // Documented limitation: the scan is not string-literal aware, so a
        // bracket inside a string value shifts the detected span.
        let text = r#"["a]"]"#;
        assert_eq!(locate_slice(text, '[', ']', 0), Some(r#"["a]"#));
    }
}
