#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_render::{EditHint, Renderer};
use core_state::{Action, Session};
use core_text::{LineStore, Position, StoreOptions};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// One `present` call as seen by the renderer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub hint: EditHint,
    pub cursor: Position,
    /// Text of the anchor row at present time (None when the anchor row no longer exists).
    pub anchor_row: Option<String>,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Frame>,
    pub fail: bool,
}

impl Renderer for RecordingRenderer {
    fn present(
        &mut self,
        hint: &EditHint,
        cursor: Position,
        store: &mut LineStore,
    ) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("terminal gone");
        }
        let anchor_row = store.at(hint.anchor.row).ok().map(str::to_owned);
        self.frames.push(Frame {
            hint: *hint,
            cursor,
            anchor_row,
        });
        Ok(())
    }
}

pub fn open(src: &str) -> Session {
    Session::open(src.as_bytes().to_vec(), StoreOptions::default()).unwrap()
}

pub fn lines(session: &mut Session) -> Vec<String> {
    let store = session.store_mut();
    (0..store.entries())
        .map(|i| store.at(i).unwrap().to_string())
        .collect()
}

pub fn apply_all(session: &mut Session, actions: impl IntoIterator<Item = Action>) {
    for action in actions {
        session.apply(action).unwrap();
    }
}

/// Captures formatted log output for assertions.
#[derive(Clone, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.inner.lock().unwrap().clone()).unwrap()
    }
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

/// Run `f` with a subscriber writing into the returned buffer.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(buffer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, buffer.contents())
}
