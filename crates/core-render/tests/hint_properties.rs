//! Property-based tests for HintEngine invariants.

use core_render::{CursorHint, EditKind, HintEngine, UpdateHint};
use core_text::Position;
use proptest::prelude::*;

fn pos() -> impl Strategy<Value = Position> {
    (0usize..500, 0usize..200).prop_map(|(r, c)| Position::new(r, c))
}

proptest! {
    // Cursor-only movement never asks for a repaint and anchors at the new position.
    #[test]
    fn cursor_moves_never_repaint(before in pos(), after in pos()) {
        let h = HintEngine::classify(before, after, EditKind::CursorMove);
        prop_assert_eq!(h.update, UpdateHint::None);
        prop_assert_eq!(h.anchor, after);
        let adjacent = before.is_horizontal_neighbor(&after) || before.is_vertical_neighbor(&after);
        if before != after && !adjacent {
            prop_assert_eq!(h.cursor, CursorHint::Jump);
        }
    }

    // In-line edits anchor at the pre-edit cursor.
    #[test]
    fn line_edits_anchor_before(before in pos(), after in pos()) {
        for kind in [EditKind::InsertChar, EditKind::DeleteChar, EditKind::DeleteUnder] {
            let h = HintEngine::classify(before, after, kind);
            prop_assert_eq!(h.update, UpdateHint::LinePastPoint);
            prop_assert_eq!(h.anchor, before);
        }
    }

    // Join anchors never come after the pre-edit cursor row.
    #[test]
    fn join_anchor_precedes_before(before in pos(), after in pos()) {
        let h = HintEngine::classify(before, after, EditKind::JoinPrevious);
        prop_assert!(h.anchor.row <= before.row);
        prop_assert_eq!(h.cursor, CursorHint::WrapUp);
    }
}
