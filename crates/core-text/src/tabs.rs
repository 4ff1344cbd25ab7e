//! Column math with tab expansion.
//!
//! Lines are stored byte for byte; a tab only affects how far the display
//! column advances (to the next multiple of the tab width). Every other
//! `char` counts as one column.

/// Display column reached after the first `byte` bytes of `line`.
pub fn display_col(line: &str, byte: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut col = 0;
    for (idx, ch) in line.char_indices() {
        if idx >= byte {
            break;
        }
        col = advance(col, ch, tab_width);
    }
    col
}

/// Total display width of `line`.
pub fn display_width(line: &str, tab_width: usize) -> usize {
    display_col(line, line.len(), tab_width)
}

/// Byte offset of the character covering display column `col`.
///
/// Lands on the start of a tab when `col` falls inside its expansion and on
/// `line.len()` when `col` is past the end.
pub fn byte_at_display_col(line: &str, col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut cur = 0;
    for (idx, ch) in line.char_indices() {
        let next = advance(cur, ch, tab_width);
        if next > col {
            return idx;
        }
        cur = next;
    }
    line.len()
}

/// Start of the character before `byte` (0 at line start).
pub fn prev_boundary(line: &str, byte: usize) -> usize {
    if byte == 0 {
        return 0;
    }
    let mut b = byte.min(line.len()) - 1;
    while b > 0 && !line.is_char_boundary(b) {
        b -= 1;
    }
    b
}

/// End of the character starting at `byte` (`line.len()` at line end).
pub fn next_boundary(line: &str, byte: usize) -> usize {
    if byte >= line.len() {
        return line.len();
    }
    let mut b = byte + 1;
    while b < line.len() && !line.is_char_boundary(b) {
        b += 1;
    }
    b
}

/// Largest `char` boundary not after `byte`.
pub fn floor_boundary(line: &str, byte: usize) -> usize {
    if byte >= line.len() {
        return line.len();
    }
    let mut b = byte;
    while !line.is_char_boundary(b) {
        b -= 1;
    }
    b
}

fn advance(col: usize, ch: char, tab_width: usize) -> usize {
    if ch == '\t' {
        (col / tab_width + 1) * tab_width
    } else {
        col + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_advance_to_next_stop() {
        assert_eq!(display_col("\tx", 1, 4), 4);
        assert_eq!(display_col("ab\tx", 3, 4), 4);
        assert_eq!(display_col("abcd\tx", 5, 4), 8);
        assert_eq!(display_width("a\tb\t", 8), 16);
        assert_eq!(display_width("plain", 4), 5);
    }

    #[test]
    fn byte_lookup_inverts_display_col() {
        let s = "a\tbc";
        assert_eq!(byte_at_display_col(s, 0, 4), 0);
        assert_eq!(byte_at_display_col(s, 2, 4), 1); // inside the tab
        assert_eq!(byte_at_display_col(s, 4, 4), 2);
        assert_eq!(byte_at_display_col(s, 5, 4), 3);
        assert_eq!(byte_at_display_col(s, 40, 4), s.len());
    }

    #[test]
    fn boundaries_skip_multibyte_chars() {
        let s = "aé€b";
        let after_a = next_boundary(s, 0);
        let after_e = next_boundary(s, after_a);
        let after_euro = next_boundary(s, after_e);
        assert_eq!((after_a, after_e, after_euro), (1, 3, 6));
        assert_eq!(prev_boundary(s, after_euro), after_e);
        assert_eq!(prev_boundary(s, after_e), after_a);
        assert_eq!(prev_boundary(s, 0), 0);
        assert_eq!(next_boundary(s, s.len()), s.len());
        assert_eq!(floor_boundary(s, 4), 3);
        assert_eq!(floor_boundary(s, 99), s.len());
    }

    #[test]
    fn zero_tab_width_behaves_like_one() {
        assert_eq!(display_width("\t\t", 0), 2);
    }
}
