//! CPU/GPU synchronization.
//!
//! The CPU and GPU run asynchronously. Any CPU write to memory the GPU may still
//! be reading corrupts the frame, so every reuse of per-frame data goes through
//! a `SyncGate`.

mod fence;
mod gate;
mod queue_fence;

pub use fence::Fence;
pub use gate::{SyncGate, INITIAL_FENCE_VALUE};
pub use queue_fence::QueueFence;

