//! Off-screen renderer that applies edit hints to a shadow copy of the
//! visible rows.
//!
//! Only the rows and columns a hint names are refreshed from the store; every
//! other visible byte is carried over from the previous frame. Scrolling to
//! keep the cursor visible forces a full repaint.

use core_render::{EditHint, Renderer, UpdateHint};
use core_text::{LineStore, Position, tabs};
use tracing::{debug, trace};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    pub full_repaints: u64,
    pub rows_repainted: u64,
    pub bytes_repainted: u64,
}

#[derive(Debug)]
pub struct ShadowRenderer {
    height: usize,
    top: usize,
    rows: Vec<String>,
    stats: RenderStats,
}

impl ShadowRenderer {
    pub fn new(height: usize) -> Self {
        Self {
            height: height.max(1),
            top: 0,
            rows: Vec::new(),
            stats: RenderStats::default(),
        }
    }

    /// Index of the first visible row.
    pub fn top(&self) -> usize {
        self.top
    }

    pub fn visible(&self) -> &[String] {
        &self.rows
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Scroll so `cursor` is visible. Returns whether the window moved.
    fn follow(&mut self, cursor: Position) -> bool {
        let prev = self.top;
        if cursor.row < self.top {
            self.top = cursor.row;
        } else if cursor.row >= self.top + self.height {
            self.top = cursor.row + 1 - self.height;
        }
        self.top != prev
    }

    fn window_end(&self, store: &LineStore) -> usize {
        (self.top + self.height).min(store.entries())
    }

    fn repaint_all(&mut self, store: &mut LineStore) -> anyhow::Result<()> {
        self.stats.full_repaints += 1;
        self.rows.clear();
        self.repaint_from_row(self.top, store)
    }

    /// Replace visible rows at and after `row` with store contents.
    fn repaint_from_row(&mut self, row: usize, store: &mut LineStore) -> anyhow::Result<()> {
        let row = row.max(self.top);
        let end = self.window_end(store);
        self.rows.truncate(row.saturating_sub(self.top));
        for r in self.top + self.rows.len()..end {
            let text = store.at(r)?;
            self.stats.rows_repainted += 1;
            self.stats.bytes_repainted += text.len() as u64;
            self.rows.push(text.to_owned());
        }
        Ok(())
    }

    /// Refresh one visible row from byte column `col` onward.
    fn repaint_row_tail(&mut self, row: usize, col: usize, store: &mut LineStore) -> anyhow::Result<()> {
        if row < self.top || row >= self.window_end(store) {
            return Ok(());
        }
        let slot = row - self.top;
        let fresh = store.at(row)?;
        let from = tabs::floor_boundary(fresh, col);
        let Some(old) = self.rows.get_mut(slot) else {
            self.rows.push(fresh.to_owned());
            self.stats.rows_repainted += 1;
            self.stats.bytes_repainted += fresh.len() as u64;
            return Ok(());
        };
        let keep = tabs::floor_boundary(old, col);
        old.truncate(keep);
        old.push_str(&fresh[from..]);
        self.stats.rows_repainted += 1;
        self.stats.bytes_repainted += (fresh.len() - from) as u64;
        Ok(())
    }
}

impl Renderer for ShadowRenderer {
    fn present(&mut self, hint: &EditHint, cursor: Position, store: &mut LineStore) -> anyhow::Result<()> {
        self.stats.frames += 1;
        let scrolled = self.follow(cursor);
        let anchor = hint.anchor;
        // Deletes move the cursor left of the anchor; repaint from whichever is first.
        let col = if cursor.row == anchor.row {
            anchor.col.min(cursor.col)
        } else {
            anchor.col
        };
        if scrolled || self.rows.is_empty() {
            self.repaint_all(store)?;
        } else {
            match hint.update {
                UpdateHint::None => {}
                UpdateHint::Line => self.repaint_row_tail(anchor.row, 0, store)?,
                UpdateHint::LinePastPoint => self.repaint_row_tail(anchor.row, col, store)?,
                UpdateHint::Screen => self.repaint_all(store)?,
                UpdateHint::ScreenPastPoint => {
                    self.repaint_row_tail(anchor.row, col, store)?;
                    self.repaint_from_row(anchor.row + 1, store)?;
                }
            }
        }
        trace!(
            target: "render",
            update = ?hint.update,
            cursor_hint = ?hint.cursor,
            anchor = %anchor,
            cursor = %cursor,
            top = self.top,
            scrolled,
            "frame_presented"
        );
        Ok(())
    }
}

impl Drop for ShadowRenderer {
    fn drop(&mut self) {
        let s = self.stats;
        debug!(
            target: "render",
            frames = s.frames,
            full_repaints = s.full_repaints,
            rows_repainted = s.rows_repainted,
            bytes_repainted = s.bytes_repainted,
            "renderer_stats"
        );
    }
}
