//! Edit hint policy table: one row per edit kind.

use core_render::{CursorHint, EditHint, EditKind, HintEngine, UpdateHint};
use core_text::Position;
use pretty_assertions::assert_eq;

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

#[test]
fn policy_table() {
    let cases = [
        // (before, after, kind, expected)
        (
            p(4, 10),
            p(4, 11),
            EditKind::InsertChar,
            EditHint::new(p(4, 10), UpdateHint::LinePastPoint, CursorHint::Right),
        ),
        (
            p(4, 10),
            p(4, 9),
            EditKind::DeleteChar,
            EditHint::new(p(4, 10), UpdateHint::LinePastPoint, CursorHint::Left),
        ),
        (
            p(4, 10),
            p(4, 10),
            EditKind::DeleteUnder,
            EditHint::new(p(4, 10), UpdateHint::LinePastPoint, CursorHint::None),
        ),
        (
            p(4, 10),
            p(5, 0),
            EditKind::SplitLine,
            EditHint::new(p(4, 10), UpdateHint::ScreenPastPoint, CursorHint::WrapDown),
        ),
        (
            p(4, 10),
            p(5, 2),
            EditKind::SplitLine,
            EditHint::new(p(4, 10), UpdateHint::ScreenPastPoint, CursorHint::Down),
        ),
        (
            p(5, 0),
            p(4, 10),
            EditKind::JoinPrevious,
            EditHint::new(p(4, 10), UpdateHint::ScreenPastPoint, CursorHint::WrapUp),
        ),
        (
            p(4, 10),
            p(4, 10),
            EditKind::JoinNext,
            EditHint::new(p(4, 10), UpdateHint::ScreenPastPoint, CursorHint::None),
        ),
        (
            p(9, 9),
            p(0, 0),
            EditKind::Structural,
            EditHint::new(p(0, 0), UpdateHint::Screen, CursorHint::Jump),
        ),
        (
            p(3, 3),
            p(3, 4),
            EditKind::CursorMove,
            EditHint::new(p(3, 4), UpdateHint::None, CursorHint::Right),
        ),
        (
            p(3, 3),
            p(27, 0),
            EditKind::CursorMove,
            EditHint::new(p(27, 0), UpdateHint::None, CursorHint::Jump),
        ),
    ];
    for (before, after, kind, expected) in cases {
        assert_eq!(
            HintEngine::classify(before, after, kind),
            expected,
            "{kind:?} {before} -> {after}"
        );
    }
}

#[test]
fn malformed_input_is_classified_literally() {
    // Insert reported with a cursor that went backwards: still an insert.
    let h = HintEngine::classify(p(2, 5), p(0, 0), EditKind::InsertChar);
    assert_eq!(h, EditHint::new(p(2, 5), UpdateHint::LinePastPoint, CursorHint::Right));
}
