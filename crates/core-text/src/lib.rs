//! Line-oriented text storage for the editor.
//!
//! * [`Position`]: comparable (row, column) value used for the cursor and for
//!   edit hint anchors.
//! * [`LineStore`]: ordered sequence of [`Line`]s. A loaded file is kept as one
//!   [`RawDocument`]; lines reference it until first read, then own their text.
//! * [`tabs`]: column math with tab expansion (stored bytes never change).
//!
//! Lines are byte oriented. Columns are byte offsets kept on `char`
//! boundaries; no grapheme segmentation is performed here.

pub mod error;
pub mod line;
pub mod position;
pub mod store;
pub mod tabs;

pub use error::{StoreError, StoreResult};
pub use line::{Line, LineEnding, LineOffsetTable, RawDocument, RawSpan};
pub use position::Position;
pub use store::{
    DEFAULT_GROW_BY, DEFAULT_INITIAL_CAPACITY, DEFAULT_TAB_WIDTH, LineStore, StoreMetricsSnapshot,
    StoreOptions,
};
