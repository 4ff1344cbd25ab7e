//! `lined`: drive a line-editing session from a script of textual actions.

mod autosave;
mod render;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use core_state::{Session, save_to_path, write_document};
use core_text::StoreOptions;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use crate::autosave::AutosaveHook;
use crate::render::ShadowRenderer;
use crate::script::ScriptSource;

/// Bound on decoded actions waiting for the session.
const ACTION_CHANNEL_CAP: usize = 64;
/// Minimum gap between autosaves.
const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(2);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lined", version, about = "Scriptable line editor")]
struct Args {
    /// File to edit. Missing files start empty and are created on save.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `lined.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Read actions from this file instead of stdin.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
    /// Write the result here instead of back to `path`.
    #[arg(long = "output")]
    pub output: Option<PathBuf>,
    /// Rows in the off-screen viewport.
    #[arg(long = "rows", default_value_t = 24)]
    pub rows: usize,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "lined.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard stops the writer.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// File bytes, or empty when the file does not exist yet.
fn read_document(path: Option<&Path>) -> Result<Vec<u8>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    match std::fs::read(path) {
        Ok(bytes) => {
            tracing::debug!(target: "io", file = %path.display(), size = bytes.len(), "file_read_ok");
            Ok(bytes)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(target: "io", file = %path.display(), "file_new");
            Ok(Vec::new())
        }
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

fn script_reader(script: Option<&Path>) -> Result<Box<dyn BufRead + Send>> {
    Ok(match script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("open script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn run(args: Args) -> Result<()> {
    let config = load_from(args.config.clone())?;
    let eff = config.effective;
    let options = StoreOptions {
        initial_capacity: eff.initial_capacity,
        grow_by: eff.grow_by,
        tab_width: eff.tab_width,
    };

    let bytes = read_document(args.path.as_deref())?;
    let mut session = Session::open(bytes, options)
        .with_context(|| format!("open {}", args.path.as_deref().unwrap_or(Path::new("<new>")).display()))?;
    let target = args.output.clone().or_else(|| args.path.clone());
    info!(
        target: "runtime.startup",
        path = ?args.path,
        output = ?target,
        lines = session.store().entries(),
        config_override = args.config.is_some(),
        config_source = ?config.source,
        autosave = eff.autosave,
        "bootstrap_complete"
    );

    if eff.autosave
        && let Some(path) = target.clone()
    {
        session.register_idle(Box::new(AutosaveHook::new(path, AUTOSAVE_INTERVAL)));
    }

    let (tx, rx) = crossbeam_channel::bounded(ACTION_CHANNEL_CAP);
    let source = ScriptSource::new(script_reader(args.script.as_deref())?, args.path.clone(), tx);
    let producer = source.spawn()?;

    let mut renderer = ShadowRenderer::new(args.rows);
    // On failure the producer may still be blocked reading stdin; leave it detached.
    let summary = session.run(&rx, &mut renderer, eff.idle_timeout)?;
    drop(rx);
    let exit = producer
        .join()
        .map_err(|_| anyhow::anyhow!("input thread panicked"))?;
    let frames = renderer.stats();
    info!(
        target: "runtime.shutdown",
        source = exit.as_str(),
        actions = summary.actions,
        rejected = summary.rejected,
        idle_passes = summary.idle_passes,
        frames = frames.frames,
        full_repaints = frames.full_repaints,
        top = renderer.top(),
        visible_rows = renderer.visible().len(),
        "session_finished"
    );

    match target {
        Some(path) => {
            save_to_path(session.store_mut(), &path)?;
        }
        None => {
            write_document(session.store_mut(), io::stdout().lock())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");
    let args = Args::parse();
    let result = run(args);
    if let Err(e) = &result {
        error!(target: "runtime", error = %format!("{e:#}"), "fatal");
    }
    result
}
