#![forbid(unsafe_code)]

//! Test harness for the reorder engine.
//!
//! - [`board`]: a simulated host that lays out collections and records
//!   every presenter call.
//! - [`recorder`]: hooks that capture sort/transfer notifications.
//! - [`scenario`]: engine, board and recorder driven together by
//!   document-space pointer helpers.

pub mod board;
pub mod recorder;
pub mod scenario;

pub use board::{Board, BoardCall, BoardCollection, BoardLayout, item_id};
pub use recorder::{HookRecorder, Notification};
pub use scenario::Scenario;
