//! Redraw classification for the line editor.
//!
//! * `hint`: the pure `HintEngine` turning (before, after, kind) into an
//!   [`EditHint`] (anchor, region to update, cursor movement class).
//! * `renderer`: the [`Renderer`] trait the editing session hands each hint to.

pub mod hint;
pub mod renderer;

pub use hint::{CursorHint, EditHint, EditKind, HintEngine, UpdateHint};
pub use renderer::{NoopRenderer, Renderer};
