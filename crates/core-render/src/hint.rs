//! Edit hint classification.
//!
//! `HintEngine::classify` maps one edit, described by the cursor position
//! before and after it plus its [`EditKind`], onto the smallest redraw the
//! renderer can get away with. The anchor is the earliest changed point so the
//! renderer repaints only the tail of a line, or the screen from that point
//! down, instead of the whole document.
//!
//! Policy:
//!
//! | kind            | update            | anchor                      | cursor                    |
//! |-----------------|-------------------|-----------------------------|---------------------------|
//! | `InsertChar`    | `LinePastPoint`   | before                      | `Right`                   |
//! | `DeleteChar`    | `LinePastPoint`   | before                      | `Left`                    |
//! | `DeleteUnder`   | `LinePastPoint`   | before                      | `None`                    |
//! | `SplitLine`     | `ScreenPastPoint` | before                      | `WrapDown` / `Down`       |
//! | `JoinPrevious`  | `ScreenPastPoint` | (before.row - 1, after.col) | `WrapUp`                  |
//! | `JoinNext`      | `ScreenPastPoint` | before                      | `None`                    |
//! | `Structural`    | `Screen`          | origin                      | `Jump`                    |
//! | `CursorMove`    | `None`            | after                       | adjacency based           |
//!
//! The engine holds no state and never fails; inputs that make no sense for
//! the given kind are classified literally.

use core_text::Position;

/// Screen region the renderer must refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateHint {
    /// Nothing to repaint.
    None,
    /// The whole anchor row.
    Line,
    /// The anchor row from the anchor column to its end.
    LinePastPoint,
    /// Every visible row.
    Screen,
    /// From the anchor point to the bottom of the screen.
    ScreenPastPoint,
}

/// How the cursor moved relative to where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    None,
    Left,
    Right,
    Up,
    Down,
    /// Arbitrary relocation; the renderer should address it absolutely.
    Jump,
    /// To the start of the following row.
    WrapDown,
    /// To the end of the preceding row.
    WrapUp,
}

/// Edit classes understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Single character inserted on the cursor row.
    InsertChar,
    /// Single character removed before the cursor on the same row (backspace).
    DeleteChar,
    /// Single character removed under the cursor; the cursor stays put.
    DeleteUnder,
    /// Newline splitting the cursor row.
    SplitLine,
    /// Backspace at column 0 joining the row into the previous one.
    JoinPrevious,
    /// Forward delete at end of row pulling the next row up.
    JoinNext,
    /// Multi-row change: paste, multi-row delete, reload.
    Structural,
    /// Cursor moved without any content change.
    CursorMove,
}

/// Redraw instruction for one edit. Consumed once by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditHint {
    pub anchor: Position,
    pub update: UpdateHint,
    pub cursor: CursorHint,
}

impl EditHint {
    pub const fn new(anchor: Position, update: UpdateHint, cursor: CursorHint) -> Self {
        Self {
            anchor,
            update,
            cursor,
        }
    }

    pub fn start_row(&self) -> usize {
        self.anchor.row
    }

    pub fn start_col(&self) -> usize {
        self.anchor.col
    }

    /// True when neither content nor cursor changed.
    pub fn is_noop(&self) -> bool {
        self.update == UpdateHint::None && self.cursor == CursorHint::None
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HintEngine;

impl HintEngine {
    /// Classify a single edit.
    pub fn classify(before: Position, after: Position, kind: EditKind) -> EditHint {
        let hint = match kind {
            EditKind::InsertChar => {
                EditHint::new(before, UpdateHint::LinePastPoint, CursorHint::Right)
            }
            EditKind::DeleteChar => {
                EditHint::new(before, UpdateHint::LinePastPoint, CursorHint::Left)
            }
            EditKind::DeleteUnder => {
                EditHint::new(before, UpdateHint::LinePastPoint, CursorHint::None)
            }
            EditKind::SplitLine => {
                let wraps = after.col == 0 && after.row == before.row + 1;
                let cursor = if wraps {
                    CursorHint::WrapDown
                } else {
                    CursorHint::Down
                };
                EditHint::new(before, UpdateHint::ScreenPastPoint, cursor)
            }
            EditKind::JoinPrevious => EditHint::new(
                Position::new(before.row.saturating_sub(1), after.col),
                UpdateHint::ScreenPastPoint,
                CursorHint::WrapUp,
            ),
            EditKind::JoinNext => {
                EditHint::new(before, UpdateHint::ScreenPastPoint, CursorHint::None)
            }
            EditKind::Structural => {
                EditHint::new(Position::origin(), UpdateHint::Screen, CursorHint::Jump)
            }
            EditKind::CursorMove => {
                EditHint::new(after, UpdateHint::None, Self::movement(before, after))
            }
        };
        tracing::trace!(
            target: "render.hint",
            ?kind,
            before = %before,
            after = %after,
            anchor = %hint.anchor,
            update = ?hint.update,
            cursor = ?hint.cursor,
            "classify"
        );
        hint
    }

    /// Cursor-only movement class: one step in a direction, or a jump.
    fn movement(before: Position, after: Position) -> CursorHint {
        if before == after {
            CursorHint::None
        } else if before.is_horizontal_neighbor(&after) {
            if after.col > before.col {
                CursorHint::Right
            } else {
                CursorHint::Left
            }
        } else if before.is_vertical_neighbor(&after) {
            if after.row > before.row {
                CursorHint::Down
            } else {
                CursorHint::Up
            }
        } else {
            CursorHint::Jump
        }
    }
}
