//! Seam between the editing loop and whatever paints the terminal.

use crate::hint::EditHint;
use core_text::{LineStore, Position};

/// Consumer of edit hints.
///
/// Called synchronously after every action, before the next one is accepted.
/// Implementors emit the smallest terminal update the hint allows; they may
/// read (and therefore materialize) lines through `store`.
pub trait Renderer {
    fn present(&mut self, hint: &EditHint, cursor: Position, store: &mut LineStore)
    -> anyhow::Result<()>;
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn present(
        &mut self,
        hint: &EditHint,
        cursor: Position,
        store: &mut LineStore,
    ) -> anyhow::Result<()> {
        (**self).present(hint, cursor, store)
    }
}

/// Renderer that discards every hint.
#[derive(Debug, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn present(&mut self, _: &EditHint, _: Position, _: &mut LineStore) -> anyhow::Result<()> {
        Ok(())
    }
}
