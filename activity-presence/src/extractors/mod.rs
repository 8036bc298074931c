//! Title pattern extractors.
//!
//! Pure functions that pull the meaningful part out of a raw window title:
//! - Sites: video, song, stream, repository and subreddit names from browser tabs
//! - Editor: file name and language from code editor titles
//!
//! Matching is plain substring/suffix search on exact delimiter literals.

pub mod editor;
pub mod sites;

/// Display budget for the detail line, in characters
pub const DETAIL_BUDGET: usize = 128;

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `max_len` characters.
///
/// Text that fits is returned unchanged (including the empty string). Longer
/// text keeps its first `max_len - 3` characters followed by `...`.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let marker_len = ELLIPSIS.chars().count();
    if max_len <= marker_len {
        return text.chars().take(max_len).collect();
    }

    let mut truncated: String = text.chars().take(max_len - marker_len).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text before the last occurrence of `delimiter`, trimmed.
///
/// A match at index 0, or one preceded only by whitespace, counts as no match.
pub(crate) fn before_last<'a>(title: &'a str, delimiter: &str) -> Option<&'a str> {
    match title.rfind(delimiter) {
        Some(index) if index > 0 => Some(title[..index].trim()).filter(|text| !text.is_empty()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("hello", DETAIL_BUDGET), "hello");
        assert_eq!(truncate("", DETAIL_BUDGET), "");
    }

    #[test]
    fn test_truncate_exact_budget_unchanged() {
        let text = "a".repeat(DETAIL_BUDGET);
        assert_eq!(truncate(&text, DETAIL_BUDGET), text);
    }

    #[test]
    fn test_truncate_long_text() {
        for len in [DETAIL_BUDGET + 1, 200, 1000] {
            let text = "x".repeat(len);
            let truncated = truncate(&text, DETAIL_BUDGET);
            assert_eq!(truncated.chars().count(), DETAIL_BUDGET);
            assert!(truncated.ends_with(ELLIPSIS));
            assert!(truncated.starts_with(&"x".repeat(DETAIL_BUDGET - 3)));
        }
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(130);
        let truncated = truncate(&text, DETAIL_BUDGET);
        assert_eq!(truncated.chars().count(), DETAIL_BUDGET);
        assert!(truncated.ends_with("é..."));
    }

    #[test]
    fn test_truncate_tiny_budget() {
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("chrome"), "Chrome");
        assert_eq!(capitalize_first("Edge"), "Edge");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("ärger"), "Ärger");
    }

    #[test]
    fn test_before_last() {
        assert_eq!(before_last("a - b - Netflix", " - Netflix"), Some("a - b"));
        assert_eq!(before_last(" - Netflix", " - Netflix"), None);
        assert_eq!(before_last("   - Netflix", " - Netflix"), None);
        assert_eq!(before_last("Netflix", " - Netflix"), None);
    }
}
