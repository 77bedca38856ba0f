//! Per-frame constant data and the update/render cycle that owns it.

mod constants;
mod pipeline;
mod resources;

pub use constants::{aligned_size, ColorMultiplier, WvpConstants, CONSTANT_BUFFER_ALIGNMENT};
pub use pipeline::{FrameBackend, FramePipeline, FrameStatus, PipelineState, SyncPolicy};
pub use resources::{FrameResourceSet, FrameSlot, HostRegion, SlotRegion, UniformRegion};
