//! Attach sessions and the background refresh loop

mod attach;
mod refresh;

pub use attach::{attach, Session};
pub use refresh::{DetachReason, LoopState, RefreshLoop, FRAME_INTERVAL};
