//! Decoded key actions accepted by the editing session.

/// Cursor motions that never change content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    /// Move up by the given number of rows.
    PageUp(usize),
    /// Move down by the given number of rows.
    PageDown(usize),
    /// Jump to a row (clamped to the last row), column 0.
    Goto(usize),
}

/// One classified key action produced by the keyboard decoder.
#[derive(Clone, PartialEq, Eq)]
pub enum Action {
    InsertChar(char),
    /// Delete before the cursor; at column 0 joins the row into the previous one.
    Backspace,
    /// Delete under the cursor; at end of row pulls the next row up.
    DeleteUnder,
    Newline,
    /// Insert text that may span several rows.
    Paste(String),
    /// Delete this many rows starting at the cursor row.
    DeleteRows(usize),
    /// Replace the whole document with freshly loaded bytes.
    Reload(Vec<u8>),
    Move(Motion),
    Quit,
}

impl Action {
    /// Stable short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Action::InsertChar(_) => "insert_char",
            Action::Backspace => "backspace",
            Action::DeleteUnder => "delete_under",
            Action::Newline => "newline",
            Action::Paste(_) => "paste",
            Action::DeleteRows(_) => "delete_rows",
            Action::Reload(_) => "reload",
            Action::Move(_) => "move",
            Action::Quit => "quit",
        }
    }
}

// Reload payloads can be whole files; keep them out of debug output.
impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::InsertChar(c) => f.debug_tuple("InsertChar").field(c).finish(),
            Action::Paste(s) => f.debug_tuple("Paste").field(&s.len()).finish(),
            Action::DeleteRows(n) => f.debug_tuple("DeleteRows").field(n).finish(),
            Action::Reload(bytes) => f.debug_tuple("Reload").field(&bytes.len()).finish(),
            Action::Move(m) => f.debug_tuple("Move").field(m).finish(),
            other => f.write_str(other.name()),
        }
    }
}
