//! UTF-16 offset handling.
//!
//! Stored span offsets count UTF-16 code units, matching the storage API.
//! Rust strings are UTF-8, so every slice goes through these helpers.

/// A code-unit range `[start, end)` into a block's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Utf16Range {
    /// Inclusive start offset in UTF-16 code units.
    pub start: usize,
    /// Exclusive end offset in UTF-16 code units.
    pub end: usize,
}

/// Number of UTF-16 code units needed to encode `s`.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Converts a UTF-16 offset into a byte offset into `s`.
///
/// Offsets past the end clamp to `s.len()`. An offset that lands inside a
/// surrogate pair rounds down to the start of that character.
pub fn byte_offset(s: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        let next = units + ch.len_utf16();
        if next > utf16_offset {
            return idx;
        }
        units = next;
    }
    s.len()
}

/// Rounds a UTF-16 offset down to the nearest character boundary, clamped
/// to the text length.
pub fn snap_to_boundary(s: &str, utf16_offset: usize) -> usize {
    utf16_len(&s[..byte_offset(s, utf16_offset)])
}

/// Slices `s` by a UTF-16 range.
pub fn slice(s: &str, range: Utf16Range) -> &str {
    let start = byte_offset(s, range.start);
    let end = byte_offset(s, range.end).max(start);
    &s[start..end]
}

/// Slices `s` from a UTF-16 offset to the end.
pub fn slice_from(s: &str, start: usize) -> &str {
    &s[byte_offset(s, start)..]
}

/// Truncates to `max` characters with a "..." suffix, for outlines and logs.
pub fn preview(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_match_bytes() {
        assert_eq!(byte_offset("hello", 3), 3);
        assert_eq!(utf16_len("hello"), 5);
    }

    #[test]
    fn astral_characters_count_two_units() {
        let s = "a😀b";
        assert_eq!(utf16_len(s), 4);
        assert_eq!(byte_offset(s, 1), 1);
        assert_eq!(byte_offset(s, 3), 5);
        assert_eq!(slice(s, Utf16Range { start: 1, end: 3 }), "😀");
    }

    #[test]
    fn offset_inside_surrogate_pair_rounds_down() {
        let s = "a😀b";
        assert_eq!(byte_offset(s, 2), 1);
        assert_eq!(snap_to_boundary(s, 2), 1);
    }

    #[test]
    fn offsets_past_end_clamp() {
        assert_eq!(byte_offset("abc", 10), 3);
        assert_eq!(slice("abc", Utf16Range { start: 1, end: 10 }), "bc");
        assert_eq!(slice_from("abc", 10), "");
    }

    #[test]
    fn bmp_non_ascii_is_one_unit() {
        let s = "héllo";
        assert_eq!(utf16_len(s), 5);
        assert_eq!(slice(s, Utf16Range { start: 1, end: 2 }), "é");
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("hello world", 5), "hello...");
        assert_eq!(preview("hello", 5), "hello");
    }
}
