//! Idle-time hooks owned by the session.
//!
//! Hooks run only from the session loop while it waits for the next action,
//! so they never overlap an edit. Each registration returns an [`IdleHookId`]
//! that can later remove the hook. Hook failures are logged and do not stop
//! the remaining hooks or the loop.

use core_text::{LineStore, Position};
use tracing::{trace, warn};

/// State visible to a hook during one idle pass.
pub struct IdleContext<'a> {
    pub store: &'a mut LineStore,
    pub cursor: Position,
    pub dirty: bool,
    saved: bool,
}

impl<'a> IdleContext<'a> {
    pub fn new(store: &'a mut LineStore, cursor: Position, dirty: bool) -> Self {
        Self {
            store,
            cursor,
            dirty,
            saved: false,
        }
    }

    /// Report that the document was persisted; the session clears its dirty flag.
    pub fn mark_saved(&mut self) {
        self.saved = true;
        self.dirty = false;
    }

    pub fn saved(&self) -> bool {
        self.saved
    }
}

/// Auxiliary work run between actions (autosave, cursor blink, ...).
pub trait IdleHook {
    /// Stable identifier for logs.
    fn name(&self) -> &'static str;
    fn on_idle(&mut self, ctx: &mut IdleContext<'_>) -> anyhow::Result<()>;
}

/// Handle returned by registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdleHookId(u64);

/// Ordered hook list; hooks run in registration order.
#[derive(Default)]
pub struct IdleHooks {
    next_id: u64,
    hooks: Vec<(IdleHookId, Box<dyn IdleHook>)>,
}

impl IdleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Box<dyn IdleHook>) -> IdleHookId {
        let id = IdleHookId(self.next_id);
        self.next_id += 1;
        trace!(target: "state.idle", hook = hook.name(), id = id.0, "idle_register");
        self.hooks.push((id, hook));
        id
    }

    /// Remove a hook, returning it if the handle was live.
    pub fn unregister(&mut self, id: IdleHookId) -> Option<Box<dyn IdleHook>> {
        let idx = self.hooks.iter().position(|(hid, _)| *hid == id)?;
        Some(self.hooks.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook once. Returns the number of hooks that failed.
    pub fn run(&mut self, ctx: &mut IdleContext<'_>) -> usize {
        let mut failures = 0;
        for (id, hook) in self.hooks.iter_mut() {
            if let Err(e) = hook.on_idle(ctx) {
                failures += 1;
                warn!(target: "state.idle", hook = hook.name(), id = id.0, error = %e, "idle_hook_failed");
            }
        }
        failures
    }
}

impl std::fmt::Debug for IdleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|(id, h)| (id.0, h.name())))
            .finish()
    }
}
