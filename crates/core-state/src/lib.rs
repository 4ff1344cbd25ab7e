//! Editing session state: the document, the cursor and the loop that ties
//! key actions to store mutations and edit hints.
//!
//! Control flow per action (single threaded, synchronous):
//! 1. A decoded [`Action`] arrives on the session's channel.
//! 2. [`Session::apply`] performs at most one `LineStore` mutation and one
//!    cursor update, then classifies the edit through `HintEngine`.
//! 3. The resulting `EditHint` and cursor go to the `Renderer` before the next
//!    action is received.
//!
//! While no action arrives within the idle timeout the session runs its
//! registered [`IdleHook`]s (autosave and similar). Hooks are owned by the
//! session, never by global state.

pub mod action;
pub mod idle;
pub mod persist;
pub mod session;

pub use action::{Action, Motion};
pub use idle::{IdleContext, IdleHook, IdleHookId, IdleHooks};
pub use persist::{save_to_path, write_document};
pub use session::{RunSummary, Session, SessionError};
