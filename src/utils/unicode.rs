//! Unicode-safe helpers for editing UTF-8 text by byte cursor.

use unicode_width::UnicodeWidthStr;

/// Byte index of the character boundary before `i` (or 0).
pub fn prev_boundary(s: &str, i: usize) -> usize {
    s[..i.min(s.len())]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Byte index of the character boundary after `i` (or `s.len()`).
pub fn next_boundary(s: &str, i: usize) -> usize {
    match s[i.min(s.len())..].chars().next() {
        Some(c) => i + c.len_utf8(),
        None => s.len(),
    }
}

/// Row and terminal column of byte offset `i` in multi-line `s`.
pub fn row_col(s: &str, i: usize) -> (usize, usize) {
    let before = &s[..i.min(s.len())];
    let row = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
    (row, UnicodeWidthStr::width(&before[line_start..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_step_over_multibyte_chars() {
        let s = "a\u{e9}b";
        assert_eq!(next_boundary(s, 1), 3);
        assert_eq!(prev_boundary(s, 3), 1);
        assert_eq!(prev_boundary(s, 0), 0);
        assert_eq!(next_boundary(s, s.len()), s.len());
    }

    #[test]
    fn row_col_counts_display_width() {
        let s = "x = 1\n\u{4f60}\u{597d}";
        assert_eq!(row_col(s, s.len()), (1, 4));
        assert_eq!(row_col(s, 2), (0, 2));
    }
}
