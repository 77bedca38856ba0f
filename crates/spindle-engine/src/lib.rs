//! Spindle engine crate.
//!
//! Renders one colored cube through a fenced, N-buffered frame pipeline:
//! per-frame constants are written into the current frame slot, the frame is
//! recorded, submitted and presented, and the CPU never rewrites a slot the
//! GPU may still be reading.

pub mod config;
pub mod core;
pub mod device;
pub mod engine;
pub mod error;
pub mod frame;
pub mod input;
pub mod logging;
pub mod render;
pub mod sync;
pub mod time;
pub mod transform;
pub mod window;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
