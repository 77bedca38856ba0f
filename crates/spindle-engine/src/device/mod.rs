//! GPU device and surface management.
//!
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating and configuring the Surface (swapchain)
//! - the `FrameBackend` that records, submits and presents the cube

mod backend;
mod context;
mod error;
mod init;
mod surface;

pub use backend::SurfaceBackend;
pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use init::GpuInit;
