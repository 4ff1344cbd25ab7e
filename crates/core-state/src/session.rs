//! Editing session: one document, one cursor, one control loop.
//!
//! Each [`Action`] yields at most one store mutation, one cursor update and
//! one [`EditHint`]. Mutating handlers read (and so materialize) every line
//! they touch and reserve room for new entries before the first structural
//! change; once a handler starts mutating, the remaining steps cannot fail,
//! so a rejected action leaves the document untouched.
//!
//! Columns are byte offsets kept on `char` boundaries. Vertical motion keeps a
//! goal display column (tab expanded) so moving through short or tabbed rows
//! returns to the original column afterwards.

use crate::action::{Action, Motion};
use crate::idle::{IdleContext, IdleHook, IdleHookId, IdleHooks};
use core_render::{EditHint, EditKind, HintEngine, Renderer};
use core_text::{LineStore, Position, StoreError, StoreOptions, tabs};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, trace, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("renderer failed: {0:#}")]
    Render(anyhow::Error),
}

impl SessionError {
    /// Whether the loop must stop rather than report and continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Store(StoreError::OutOfMemory { .. }) | SessionError::Render(_)
        )
    }
}

/// Counters for one `run` invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub actions: u64,
    pub rejected: u64,
    pub idle_passes: u64,
}

#[derive(Debug)]
pub struct Session {
    store: LineStore,
    cursor: Position,
    /// Display column to aim for on vertical motion; reset by any other action.
    goal_col: Option<usize>,
    options: StoreOptions,
    dirty: bool,
    idle: IdleHooks,
}

impl Session {
    /// Open a document from raw file bytes. Empty input yields one empty row.
    pub fn open(bytes: Vec<u8>, options: StoreOptions) -> Result<Self, SessionError> {
        let store = Self::load_store(bytes, options)?;
        Ok(Self {
            store,
            cursor: Position::origin(),
            goal_col: None,
            options,
            dirty: false,
            idle: IdleHooks::new(),
        })
    }

    /// Session over an empty, never-loaded document.
    pub fn empty(options: StoreOptions) -> Result<Self, SessionError> {
        Self::open(Vec::new(), options)
    }

    fn load_store(bytes: Vec<u8>, options: StoreOptions) -> Result<LineStore, SessionError> {
        let mut store = LineStore::with_options(options);
        let size = bytes.len();
        if size == 0 {
            store.append(String::new())?;
            return Ok(store);
        }
        store.init_lazy(bytes, size, options.tab_width)?;
        debug!(target: "state.session", size, lines = store.entries(), "document_loaded");
        Ok(store)
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn store(&self) -> &LineStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LineStore {
        &mut self.store
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn register_idle(&mut self, hook: Box<dyn IdleHook>) -> IdleHookId {
        self.idle.register(hook)
    }

    pub fn unregister_idle(&mut self, id: IdleHookId) -> bool {
        self.idle.unregister(id).is_some()
    }

    /// Run every idle hook once. Returns the number of failed hooks.
    pub fn run_idle(&mut self) -> usize {
        let mut ctx = IdleContext::new(&mut self.store, self.cursor, self.dirty);
        let failures = self.idle.run(&mut ctx);
        if ctx.saved() {
            self.dirty = false;
        }
        failures
    }

    /// Apply one action and classify it.
    pub fn apply(&mut self, action: Action) -> Result<EditHint, SessionError> {
        let before = self.cursor;
        let name = action.name();
        let kind = match action {
            Action::InsertChar('\n') | Action::Newline => self.split_line()?,
            Action::InsertChar(c) => self.insert_char(c)?,
            Action::Backspace => self.backspace()?,
            Action::DeleteUnder => self.delete_under()?,
            Action::Paste(text) => self.paste(&text)?,
            Action::DeleteRows(count) => self.delete_rows(count)?,
            Action::Reload(bytes) => self.reload(bytes)?,
            Action::Move(motion) => self.motion(motion)?,
            Action::Quit => EditKind::CursorMove,
        };
        if kind != EditKind::CursorMove {
            self.goal_col = None;
        }
        let hint = HintEngine::classify(before, self.cursor, kind);
        trace!(
            target: "state.session",
            op = name,
            from = %before,
            to = %self.cursor,
            entries = self.store.entries(),
            "edit"
        );
        Ok(hint)
    }

    /// Drive the session from `actions` until the sender side disconnects or
    /// `Action::Quit` arrives. Hooks run whenever no action shows up within
    /// `idle_timeout`. Non-fatal failures are reported and skipped.
    pub fn run<R: Renderer>(
        &mut self,
        actions: &Receiver<Action>,
        renderer: &mut R,
        idle_timeout: Duration,
    ) -> Result<RunSummary, SessionError> {
        let mut summary = RunSummary::default();
        let initial = HintEngine::classify(self.cursor, self.cursor, EditKind::Structural);
        renderer
            .present(&initial, self.cursor, &mut self.store)
            .map_err(SessionError::Render)?;
        loop {
            match actions.recv_timeout(idle_timeout) {
                Ok(Action::Quit) => break,
                Ok(action) => {
                    summary.actions += 1;
                    let name = action.name();
                    let hint = match self.apply(action) {
                        Ok(hint) => hint,
                        Err(e) if e.is_fatal() => {
                            error!(target: "state.session", op = name, error = %e, "edit_fatal");
                            return Err(e);
                        }
                        Err(e) => {
                            summary.rejected += 1;
                            warn!(target: "state.session", op = name, error = %e, "edit_rejected");
                            continue;
                        }
                    };
                    renderer
                        .present(&hint, self.cursor, &mut self.store)
                        .map_err(SessionError::Render)?;
                }
                Err(RecvTimeoutError::Timeout) => {
                    summary.idle_passes += 1;
                    self.run_idle();
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!(
            target: "state.session",
            actions = summary.actions,
            rejected = summary.rejected,
            idle_passes = summary.idle_passes,
            "run_complete"
        );
        Ok(summary)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Owned copy of a row's text.
    fn row_text(&mut self, row: usize) -> Result<String, SessionError> {
        Ok(self.store.at(row)?.to_owned())
    }

    /// Cursor column snapped onto a `char` boundary of `text`.
    fn col_in(&self, text: &str) -> usize {
        tabs::floor_boundary(text, self.cursor.col)
    }

    fn insert_char(&mut self, c: char) -> Result<EditKind, SessionError> {
        let row = self.cursor.row;
        let mut text = self.row_text(row)?;
        let col = self.col_in(&text);
        text.insert(col, c);
        self.store.replace_at(row, text)?;
        self.cursor.col = col + c.len_utf8();
        self.mark_dirty();
        Ok(EditKind::InsertChar)
    }

    fn split_line(&mut self) -> Result<EditKind, SessionError> {
        let row = self.cursor.row;
        let mut head = self.row_text(row)?;
        let col = self.col_in(&head);
        let tail = head.split_off(col);
        self.store.insert_after(row, tail)?;
        self.store.replace_at(row, head)?;
        self.cursor = Position::new(row + 1, 0);
        self.mark_dirty();
        Ok(EditKind::SplitLine)
    }

    fn backspace(&mut self) -> Result<EditKind, SessionError> {
        let Position { row, col } = self.cursor;
        if col > 0 {
            let mut text = self.row_text(row)?;
            let col = self.col_in(&text);
            let prev = tabs::prev_boundary(&text, col);
            text.replace_range(prev..col, "");
            self.store.replace_at(row, text)?;
            self.cursor.col = prev;
            self.mark_dirty();
            return Ok(EditKind::DeleteChar);
        }
        if row == 0 {
            return Ok(EditKind::CursorMove);
        }
        let mut joined = self.row_text(row - 1)?;
        let tail = self.row_text(row)?;
        let join_col = joined.len();
        joined.push_str(&tail);
        self.store.remove_at(row)?;
        self.store.replace_at(row - 1, joined)?;
        self.cursor = Position::new(row - 1, join_col);
        self.mark_dirty();
        Ok(EditKind::JoinPrevious)
    }

    fn delete_under(&mut self) -> Result<EditKind, SessionError> {
        let row = self.cursor.row;
        let mut text = self.row_text(row)?;
        let col = self.col_in(&text);
        if col < text.len() {
            let next = tabs::next_boundary(&text, col);
            text.replace_range(col..next, "");
            self.store.replace_at(row, text)?;
            self.cursor.col = col;
            self.mark_dirty();
            return Ok(EditKind::DeleteUnder);
        }
        if row + 1 >= self.store.entries() {
            return Ok(EditKind::CursorMove);
        }
        let next = self.row_text(row + 1)?;
        text.push_str(&next);
        self.store.remove_at(row + 1)?;
        self.store.replace_at(row, text)?;
        self.cursor.col = col;
        self.mark_dirty();
        Ok(EditKind::JoinNext)
    }

    fn paste(&mut self, pasted: &str) -> Result<EditKind, SessionError> {
        let row = self.cursor.row;
        let current = self.row_text(row)?;
        let col = self.col_in(&current);
        let (head, tail) = current.split_at(col);
        let pieces: Vec<&str> = pasted
            .split('\n')
            .map(|p| p.strip_suffix('\r').unwrap_or(p))
            .collect();
        let added = pieces.len() - 1;
        self.store.allocate(self.store.entries() + added)?;

        let last_piece = pieces[added];
        let cursor_col = if added == 0 {
            head.len() + last_piece.len()
        } else {
            last_piece.len()
        };
        let mut rows: Vec<String> = Vec::with_capacity(pieces.len());
        for (i, piece) in pieces.iter().enumerate() {
            let mut line = String::new();
            if i == 0 {
                line.push_str(head);
            }
            line.push_str(piece);
            if i == added {
                line.push_str(tail);
            }
            rows.push(line);
        }
        let mut rows = rows.into_iter();
        if let Some(first) = rows.next() {
            self.store.replace_at(row, first)?;
        }
        for (offset, line) in rows.enumerate() {
            self.store.insert_after(row + offset, line)?;
        }
        self.cursor = Position::new(row + added, cursor_col);
        self.mark_dirty();
        debug!(target: "state.session", rows = pieces.len(), bytes = pasted.len(), "paste");
        Ok(EditKind::Structural)
    }

    fn delete_rows(&mut self, count: usize) -> Result<EditKind, SessionError> {
        let row = self.cursor.row;
        let count = count.max(1).min(self.store.entries() - row);
        for r in row..row + count {
            self.store.at(r)?;
        }
        // Removal never shrinks capacity, so the refill below cannot reallocate.
        let emptied = count == self.store.entries();
        for _ in 0..count {
            self.store.remove_at(row)?;
        }
        if emptied {
            self.store.append(String::new())?;
        }
        let last = self.store.entries() - 1;
        self.cursor = Position::new(row.min(last), 0);
        self.mark_dirty();
        Ok(EditKind::Structural)
    }

    fn reload(&mut self, bytes: Vec<u8>) -> Result<EditKind, SessionError> {
        let store = Self::load_store(bytes, self.options)?;
        // Dropping the previous store releases its raw document.
        self.store = store;
        self.cursor = Position::origin();
        self.dirty = false;
        Ok(EditKind::Structural)
    }

    fn motion(&mut self, motion: Motion) -> Result<EditKind, SessionError> {
        let Position { row, col } = self.cursor;
        let last = self.store.entries().saturating_sub(1);
        match motion {
            Motion::Left => {
                if col > 0 {
                    let text = self.store.at(row)?;
                    self.cursor.col = tabs::prev_boundary(text, col);
                }
                self.goal_col = None;
            }
            Motion::Right => {
                let text = self.store.at(row)?;
                self.cursor.col = tabs::next_boundary(text, col);
                self.goal_col = None;
            }
            Motion::LineStart => {
                self.cursor.col = 0;
                self.goal_col = None;
            }
            Motion::LineEnd => {
                self.cursor.col = self.store.line_len(row)?;
                self.goal_col = None;
            }
            Motion::Up => self.move_vertical(row.saturating_sub(1))?,
            Motion::Down => self.move_vertical((row + 1).min(last))?,
            Motion::PageUp(n) => self.move_vertical(row.saturating_sub(n))?,
            Motion::PageDown(n) => self.move_vertical(row.saturating_add(n).min(last))?,
            Motion::Goto(target) => {
                self.cursor = Position::new(target.min(last), 0);
                self.goal_col = None;
            }
        }
        Ok(EditKind::CursorMove)
    }

    fn move_vertical(&mut self, target: usize) -> Result<(), SessionError> {
        let tab_width = self.store.tab_width();
        let goal = match self.goal_col {
            Some(goal) => goal,
            None => {
                let text = self.store.at(self.cursor.row)?;
                tabs::display_col(text, self.cursor.col, tab_width)
            }
        };
        let text = self.store.at(target)?;
        self.cursor = Position::new(target, tabs::byte_at_display_col(text, goal, tab_width));
        self.goal_col = Some(goal);
        Ok(())
    }
}
