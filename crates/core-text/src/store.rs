//! Ordered, mutable sequence of lines with lazy materialization.
//!
//! Invariants (hold after every public call, including rejected ones):
//! * `entries() <= capacity()`.
//! * A `Line::Raw` entry exists only while `raw` is `Some`, and its span lies
//!   inside that document.
//! * Index validation and any allocation happen before a structural change,
//!   so an `Err` never leaves entries partially shifted.
//! * Lines returned by `remove_at` / `replace_at` are always `Line::Owned`.
//!
//! Growth follows a fixed-chunk policy: `allocate` sets up the initial
//! capacity and `reallocate` adds `grow_by` slots whenever the store is full.
//! Construction never allocates; the first entry reserves
//! `initial_capacity`, so an oversized option surfaces as `OutOfMemory`.
//! Shifts on insert/remove cost O(entries after the index).

use crate::error::{StoreError, StoreResult};
use crate::line::{Line, LineEnding, LineOffsetTable, RawDocument, RawSpan};
use tracing::{debug, trace, warn};

pub const DEFAULT_INITIAL_CAPACITY: usize = 10;
pub const DEFAULT_GROW_BY: usize = 10;
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Construction parameters for a [`LineStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub initial_capacity: usize,
    pub grow_by: usize,
    pub tab_width: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            grow_by: DEFAULT_GROW_BY,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Counters describing store activity since construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreMetricsSnapshot {
    pub materializations: u64,
    pub reallocations: u64,
    pub structural_edits: u64,
}

// Plain counters; the store is only ever touched from the editing loop.
#[derive(Debug, Default, Clone)]
struct StoreMetrics {
    materializations: u64,
    reallocations: u64,
    structural_edits: u64,
}

#[derive(Debug)]
pub struct LineStore {
    lines: Vec<Line>,
    /// Present exactly while the store is in lazy mode.
    raw: Option<RawDocument>,
    initial_capacity: usize,
    grow_by: usize,
    tab_width: usize,
    ending: LineEnding,
    final_terminator: bool,
    metrics: StoreMetrics,
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStore {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            lines: Vec::new(),
            raw: None,
            initial_capacity: options.initial_capacity.max(1),
            grow_by: options.grow_by.max(1),
            tab_width: options.tab_width.max(1),
            ending: LineEnding::default(),
            final_terminator: true,
            metrics: StoreMetrics::default(),
        }
    }

    /// Ensure room for at least `initial_capacity` entries. Existing entries are untouched.
    pub fn allocate(&mut self, initial_capacity: usize) -> StoreResult<()> {
        if self.lines.capacity() >= initial_capacity {
            return Ok(());
        }
        let additional = initial_capacity - self.lines.len();
        self.lines
            .try_reserve_exact(additional)
            .map_err(|_| StoreError::OutOfMemory {
                requested: additional,
            })?;
        trace!(target: "text.store", capacity = self.lines.capacity(), "allocate");
        Ok(())
    }

    /// Grow backing storage by `grow_by` slots past the current entry count.
    pub fn reallocate(&mut self, grow_by: usize) -> StoreResult<()> {
        let before = self.lines.capacity();
        self.lines
            .try_reserve_exact(grow_by)
            .map_err(|_| StoreError::OutOfMemory { requested: grow_by })?;
        self.metrics.reallocations += 1;
        trace!(
            target: "text.store",
            before,
            after = self.lines.capacity(),
            entries = self.lines.len(),
            "reallocate"
        );
        Ok(())
    }

    /// Take ownership of `raw` and describe its lines without copying any bytes.
    ///
    /// Only valid on an empty store that has never been lazily initialized. On
    /// failure the store stays empty and non-lazy.
    pub fn init_lazy(&mut self, raw: Vec<u8>, size: usize, tab_spaces: usize) -> StoreResult<()> {
        if !self.lines.is_empty() {
            return Err(StoreError::NotEmpty {
                entries: self.lines.len(),
            });
        }
        if self.raw.is_some() {
            return Err(StoreError::AlreadyLazy);
        }
        let doc = RawDocument::from_bytes(raw, size).inspect_err(|e| {
            warn!(target: "text.store", size, error = %e, "init_lazy_rejected");
        })?;
        let table = LineOffsetTable::scan(&doc, tab_spaces);
        self.allocate(table.len())?;
        self.lines.extend(table.spans().iter().copied().map(Line::Raw));
        self.tab_width = table.tab_width();
        self.ending = table.ending();
        self.final_terminator = table.final_terminator();
        debug!(
            target: "text.store",
            bytes = doc.len(),
            lines = table.len(),
            tab_width = self.tab_width,
            ending = ?self.ending,
            "init_lazy"
        );
        self.raw = Some(doc);
        Ok(())
    }

    pub fn entries(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lines.capacity()
    }

    pub fn is_lazy(&self) -> bool {
        self.raw.is_some()
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    /// Whether the last line should be followed by a terminator when written out.
    /// True for stores built line by line; lazily loaded stores mirror their source.
    pub fn final_terminator(&self) -> bool {
        self.final_terminator
    }

    /// Whether entry `index` still references the raw document.
    pub fn is_raw(&self, index: usize) -> StoreResult<bool> {
        self.check_index(index)?;
        Ok(self.lines[index].is_raw())
    }

    /// Number of entries still pending materialization.
    pub fn raw_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.is_raw()).count()
    }

    /// Byte length of entry `index`; raw entries answer from their span without materializing.
    pub fn line_len(&self, index: usize) -> StoreResult<usize> {
        self.check_index(index)?;
        Ok(match &self.lines[index] {
            Line::Raw(span) => span.len(),
            Line::Owned(s) => s.len(),
        })
    }

    pub fn metrics_snapshot(&self) -> StoreMetricsSnapshot {
        StoreMetricsSnapshot {
            materializations: self.metrics.materializations,
            reallocations: self.metrics.reallocations,
            structural_edits: self.metrics.structural_edits,
        }
    }

    /// Text of entry `index`, materializing it first if it is still raw.
    pub fn at(&mut self, index: usize) -> StoreResult<&str> {
        self.check_index(index)?;
        self.materialize(index)?;
        Ok(self.lines[index].text().unwrap_or_default())
    }

    /// Materialize every remaining raw entry in ascending order.
    pub fn materialize_all(&mut self) -> StoreResult<()> {
        for index in 0..self.lines.len() {
            self.materialize(index)?;
        }
        Ok(())
    }

    pub fn append(&mut self, line: impl Into<Line>) -> StoreResult<()> {
        let line = owned_only(line.into())?;
        self.ensure_slot()?;
        self.lines.push(line);
        self.metrics.structural_edits += 1;
        Ok(())
    }

    pub fn insert_before(&mut self, index: usize, line: impl Into<Line>) -> StoreResult<()> {
        self.check_index(index)?;
        let line = owned_only(line.into())?;
        self.ensure_slot()?;
        self.lines.insert(index, line);
        self.metrics.structural_edits += 1;
        trace!(target: "text.store", index, entries = self.lines.len(), "insert_before");
        Ok(())
    }

    pub fn insert_after(&mut self, index: usize, line: impl Into<Line>) -> StoreResult<()> {
        self.check_index(index)?;
        let line = owned_only(line.into())?;
        self.ensure_slot()?;
        self.lines.insert(index + 1, line);
        self.metrics.structural_edits += 1;
        trace!(target: "text.store", index, entries = self.lines.len(), "insert_after");
        Ok(())
    }

    /// Swap in `line` at `index`, handing the previous (materialized) line to the caller.
    pub fn replace_at(&mut self, index: usize, line: impl Into<Line>) -> StoreResult<Line> {
        self.check_index(index)?;
        let line = owned_only(line.into())?;
        self.materialize(index)?;
        let old = std::mem::replace(&mut self.lines[index], line);
        self.metrics.structural_edits += 1;
        Ok(old)
    }

    /// Remove entry `index`, handing its (materialized) line to the caller.
    pub fn remove_at(&mut self, index: usize) -> StoreResult<Line> {
        self.check_index(index)?;
        self.materialize(index)?;
        let old = self.lines.remove(index);
        self.metrics.structural_edits += 1;
        trace!(target: "text.store", index, entries = self.lines.len(), "remove_at");
        Ok(old)
    }

    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                entries: self.lines.len(),
            })
        }
    }

    fn ensure_slot(&mut self) -> StoreResult<()> {
        if self.lines.capacity() == 0 {
            self.allocate(self.initial_capacity)?;
        } else if self.lines.len() == self.lines.capacity() {
            self.reallocate(self.grow_by)?;
        }
        Ok(())
    }

    /// Raw -> Owned transition for entry `index` (no-op when already owned).
    fn materialize(&mut self, index: usize) -> StoreResult<()> {
        let Line::Raw(span) = self.lines[index] else {
            return Ok(());
        };
        let text = self.copy_out(span)?;
        self.lines[index] = Line::Owned(text);
        self.metrics.materializations += 1;
        trace!(target: "text.store", index, len = span.len(), "materialize");
        Ok(())
    }

    fn copy_out(&self, span: RawSpan) -> StoreResult<String> {
        let Some(doc) = self.raw.as_ref() else {
            return Err(StoreError::InvalidRawBuffer {
                reason: "raw line without a raw document",
            });
        };
        let src = doc.slice(span).ok_or(StoreError::InvalidRawBuffer {
            reason: "raw line outside its document",
        })?;
        let mut text = String::new();
        text.try_reserve_exact(src.len())
            .map_err(|_| StoreError::OutOfMemory {
                requested: src.len(),
            })?;
        text.push_str(src);
        Ok(text)
    }
}

/// `Raw` lines only enter a store through `init_lazy`.
fn owned_only(line: Line) -> StoreResult<Line> {
    match line {
        Line::Raw(_) => Err(StoreError::InvalidRawBuffer {
            reason: "raw lines cannot be inserted",
        }),
        owned => Ok(owned),
    }
}
