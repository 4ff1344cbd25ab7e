//! Writing a document out through `LineStore::at` in ascending row order.

use anyhow::{Context, Result};
use core_text::LineStore;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write every line followed by the store's line ending. The last line gets a
/// terminator only when the source document had one. Returns bytes written.
pub fn write_document<W: Write>(store: &mut LineStore, mut out: W) -> Result<usize> {
    let ending = store.line_ending().as_str();
    let last = store.entries().saturating_sub(1);
    let final_terminator = store.final_terminator();
    let mut written = 0;
    for row in 0..store.entries() {
        let text = store.at(row)?;
        out.write_all(text.as_bytes())?;
        written += text.len();
        if row < last || final_terminator {
            out.write_all(ending.as_bytes())?;
            written += ending.len();
        }
    }
    out.flush()?;
    Ok(written)
}

/// Persist to `path`, replacing its contents.
pub fn save_to_path(store: &mut LineStore, path: &Path) -> Result<usize> {
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    let written = write_document(store, BufWriter::new(file))
        .with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(target: "io", file = %path.display(), bytes = written, lines = store.entries(), "document_saved");
    Ok(written)
}
