use thiserror::Error;

/// Failures surfaced by [`crate::LineStore`] operations.
///
/// Every variant is reported before any structural change; a rejected call
/// leaves the store exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("line index {index} out of range (entries: {entries})")]
    IndexOutOfRange { index: usize, entries: usize },

    #[error("invalid raw buffer: {reason}")]
    InvalidRawBuffer { reason: &'static str },

    #[error("allocation of {requested} more slots/bytes failed")]
    OutOfMemory { requested: usize },

    #[error("lazy initialization requires an empty store (entries: {entries})")]
    NotEmpty { entries: usize },

    #[error("store already owns a raw document")]
    AlreadyLazy,
}

pub type StoreResult<T> = Result<T, StoreError>;
