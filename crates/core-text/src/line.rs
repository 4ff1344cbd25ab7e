//! Line representation for lazily loaded documents.
//!
//! A freshly loaded document is kept as one contiguous [`RawDocument`]. The
//! [`LineOffsetTable`] produced by a single forward scan describes where each
//! line lives inside it, and the store starts out holding only
//! [`Line::Raw`] references. A line becomes [`Line::Owned`] the first time its
//! text is requested and stays that way.
//!
//! Ownership:
//! * `RawDocument` belongs to exactly one `LineStore` and is dropped with it.
//! * `Owned` text belongs to its `Line` entry.
//! * `RawSpan` has no public constructor and table spans are crate-private.
//!   The store also refuses `Raw` lines on insert and replace, so a `Raw`
//!   entry only ever points into the document it was scanned from.

use crate::error::{StoreError, StoreResult};

/// Line terminator style detected while scanning a raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Byte range of one line inside a [`RawDocument`] (terminator excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan {
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl RawSpan {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One entry of a `LineStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Reference into the store's raw document; materialization pending.
    Raw(RawSpan),
    /// Independently allocated, mutable text.
    Owned(String),
}

impl Line {
    pub fn is_raw(&self) -> bool {
        matches!(self, Line::Raw(_))
    }

    /// Owned text, or `None` while the line is still a raw reference.
    pub fn text(&self) -> Option<&str> {
        match self {
            Line::Owned(s) => Some(s.as_str()),
            Line::Raw(_) => None,
        }
    }

    /// Consume the line returning its owned text, or `None` for a raw reference.
    pub fn into_text(self) -> Option<String> {
        match self {
            Line::Owned(s) => Some(s),
            Line::Raw(_) => None,
        }
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Line::Owned(s)
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Line::Owned(s.to_owned())
    }
}

/// The byte buffer handed over by the file loader.
#[derive(Debug)]
pub struct RawDocument {
    text: String,
}

impl RawDocument {
    /// Take ownership of `raw`, keeping its first `size` bytes.
    ///
    /// Truncation happens in place; no bytes are copied. UTF-8 validation is a
    /// read-only pass over the kept bytes.
    pub fn from_bytes(mut raw: Vec<u8>, size: usize) -> StoreResult<Self> {
        if size == 0 || raw.is_empty() {
            return Err(StoreError::InvalidRawBuffer {
                reason: "empty buffer",
            });
        }
        if size > raw.len() {
            return Err(StoreError::InvalidRawBuffer {
                reason: "size exceeds buffer length",
            });
        }
        raw.truncate(size);
        let text = String::from_utf8(raw).map_err(|_| StoreError::InvalidRawBuffer {
            reason: "buffer is not valid UTF-8",
        })?;
        Ok(Self { text })
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Text covered by `span`, or `None` when the span does not lie inside
    /// this document on `char` boundaries.
    pub fn slice(&self, span: RawSpan) -> Option<&str> {
        let end = span.offset.checked_add(span.len)?;
        self.text.get(span.offset..end)
    }
}

/// Per-line `(offset, length)` pairs for a raw document plus the tab width
/// used for column math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOffsetTable {
    spans: Vec<RawSpan>,
    tab_width: usize,
    ending: LineEnding,
    final_terminator: bool,
}

impl LineOffsetTable {
    /// Single forward scan splitting on `\n`.
    ///
    /// The line ending style is decided by the first terminator; in a CRLF
    /// document a `\r` directly before `\n` is part of the terminator. A final
    /// terminator does not open an extra empty line.
    pub fn scan(doc: &RawDocument, tab_width: usize) -> Self {
        let bytes = doc.as_bytes();
        let mut spans = Vec::new();
        let mut ending: Option<LineEnding> = None;
        let mut start = 0usize;
        for (idx, b) in bytes.iter().enumerate() {
            if *b != b'\n' {
                continue;
            }
            let has_cr = idx > start && bytes[idx - 1] == b'\r';
            let style = *ending.get_or_insert(if has_cr {
                LineEnding::CrLf
            } else {
                LineEnding::Lf
            });
            let end = if style == LineEnding::CrLf && has_cr {
                idx - 1
            } else {
                idx
            };
            spans.push(RawSpan {
                offset: start,
                len: end - start,
            });
            start = idx + 1;
        }
        if start < bytes.len() {
            spans.push(RawSpan {
                offset: start,
                len: bytes.len() - start,
            });
        }
        Self {
            spans,
            tab_width: tab_width.max(1),
            ending: ending.unwrap_or_default(),
            final_terminator: bytes.last() == Some(&b'\n'),
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    /// Whether the document's last line was followed by a terminator.
    pub fn final_terminator(&self) -> bool {
        self.final_terminator
    }

    pub(crate) fn spans(&self) -> &[RawSpan] {
        &self.spans
    }
}
