//! Idle hook that writes a dirty document back to disk.

use core_state::{IdleContext, IdleHook, save_to_path};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

pub struct AutosaveHook {
    path: PathBuf,
    /// Minimum gap between two saves.
    interval: Duration,
    last_save: Option<Instant>,
}

impl AutosaveHook {
    pub fn new(path: PathBuf, interval: Duration) -> Self {
        Self {
            path,
            interval,
            last_save: None,
        }
    }
}

impl IdleHook for AutosaveHook {
    fn name(&self) -> &'static str {
        "autosave"
    }

    fn on_idle(&mut self, ctx: &mut IdleContext<'_>) -> anyhow::Result<()> {
        if !ctx.dirty {
            return Ok(());
        }
        if self.last_save.is_some_and(|t| t.elapsed() < self.interval) {
            return Ok(());
        }
        let bytes = save_to_path(ctx.store, &self.path)?;
        self.last_save = Some(Instant::now());
        ctx.mark_saved();
        info!(target: "io", file = %self.path.display(), bytes, "autosave_complete");
        Ok(())
    }
}
