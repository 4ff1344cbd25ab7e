//! Cursor / anchor position value.
//!
//! A `Position` addresses a byte column inside a line of a `LineStore`. It is
//! a plain value: no allocation, no reference back to the store. Ordering is
//! lexicographic (row first, then column), which the derived `Ord` provides
//! because `row` is declared before `col`.

use std::fmt;

/// A position inside a document expressed as (row index, byte column within that row).
///
/// Columns are byte offsets; callers keep them on `char` boundaries via the
/// helpers in [`crate::tabs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Document origin (row 0, column 0).
    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// True when `other` is exactly one column left or right on the same row.
    pub fn is_horizontal_neighbor(&self, other: &Position) -> bool {
        self.row == other.row && self.col.abs_diff(other.col) == 1
    }

    /// True when `other` is on the row directly above or below, same column.
    pub fn is_vertical_neighbor(&self, other: &Position) -> bool {
        self.col == other.col && self.row.abs_diff(other.row) == 1
    }

    /// Clamp into a document with `row_count` rows, using `row_len` to fetch the
    /// byte length of the (possibly adjusted) row.
    pub fn clamp_to<F>(&mut self, row_count: usize, mut row_len: F)
    where
        F: FnMut(usize) -> usize,
    {
        if row_count == 0 {
            *self = Self::origin();
            return;
        }
        if self.row >= row_count {
            self.row = row_count - 1;
        }
        let max_len = row_len(self.row);
        if self.col > max_len {
            self.col = max_len;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_row_then_col() {
        assert!(Position::new(2, 5) > Position::new(2, 3));
        assert!(Position::new(1, 99) < Position::new(2, 0));
        assert_eq!(Position::new(3, 0), Position::new(3, 0));
        assert_eq!(
            Position::new(0, 7).max(Position::new(1, 0)),
            Position::new(1, 0)
        );
    }

    #[test]
    fn neighbors() {
        let p = Position::new(4, 10);
        assert!(p.is_horizontal_neighbor(&Position::new(4, 11)));
        assert!(p.is_horizontal_neighbor(&Position::new(4, 9)));
        assert!(!p.is_horizontal_neighbor(&Position::new(4, 12)));
        assert!(!p.is_horizontal_neighbor(&Position::new(5, 10)));
        assert!(p.is_vertical_neighbor(&Position::new(5, 10)));
        assert!(p.is_vertical_neighbor(&Position::new(3, 10)));
        assert!(!p.is_vertical_neighbor(&Position::new(5, 0)));
        assert!(!p.is_vertical_neighbor(&Position::new(6, 10)));
    }

    #[test]
    fn clamp_into_short_document() {
        let mut p = Position::new(9, 40);
        p.clamp_to(3, |row| [5, 2, 7][row]);
        assert_eq!(p, Position::new(2, 7));

        let mut q = Position::new(1, 1);
        q.clamp_to(0, |_| 0);
        assert_eq!(q, Position::origin());
    }

    #[test]
    fn display_is_row_colon_col() {
        assert_eq!(Position::new(12, 3).to_string(), "12:3");
    }
}
