//! Contracts between the window runtime and the application.
//!
//! The app never sees the event loop; it receives a `FrameCtx` holding the
//! engine and the input state.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
