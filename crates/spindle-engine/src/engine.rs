use std::time::Instant;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::config::EngineConfig;
use crate::device::{Gpu, SurfaceBackend};
use crate::error::EngineResult;
use crate::frame::{
    FramePipeline, FrameResourceSet, FrameStatus, PipelineState, UniformRegion,
    CONSTANT_BUFFER_ALIGNMENT,
};
use crate::render::CubeRenderer;
use crate::time::FrameTime;
use crate::transform::{ColorAnimator, DirectionalInput, TransformState};

/// Camera-driven cube renderer bound to one native window.
///
/// Lifecycle: `initialize` → any number of `update`/`render` pairs → `shutdown`.
/// Dropping the engine shuts it down. Any error leaves the engine faulted;
/// later calls return `EngineError::Faulted`.
pub struct Engine<'w> {
    pipeline: FramePipeline<SurfaceBackend<'w>>,
}

impl<'w> Engine<'w> {
    /// Creates the device, surface, constant buffers and cube pipeline, then
    /// drains the setup work.
    pub async fn initialize<W>(
        target: &'w W,
        width: u32,
        height: u32,
        config: EngineConfig,
    ) -> EngineResult<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Sync,
    {
        let EngineConfig {
            frames_in_flight,
            sync_policy,
            transform,
            color,
            clear_color,
            gpu,
            shaders,
        } = config;

        let gpu = Gpu::new(target, width, height, gpu).await?;

        let resources = FrameResourceSet::new(
            frames_in_flight,
            CONSTANT_BUFFER_ALIGNMENT,
            |slot, name, size| {
                let label = format!("spindle slot {slot} {name}");
                Ok(UniformRegion::new(gpu.device(), gpu.queue(), &label, size))
            },
        )?;

        let renderer = CubeRenderer::new(
            gpu.device(),
            gpu.surface_format(),
            width,
            height,
            &shaders,
            clear_color,
        );

        let backend = SurfaceBackend::new(gpu, renderer, &resources);
        let fence = backend.fence();

        let mut pipeline = FramePipeline::new(
            backend,
            fence,
            resources,
            TransformState::new(transform, width, height),
            ColorAnimator::new(color),
            sync_policy,
        );
        pipeline.initialize()?;

        log::info!(
            "engine initialized: {frames_in_flight} frames in flight, {sync_policy:?}"
        );

        Ok(Self { pipeline })
    }

    /// Feeds an absolute pointer position in physical pixels.
    pub fn on_input(&mut self, x: f32, y: f32, modifier_held: bool) {
        self.pipeline.on_input(x, y, modifier_held);
    }

    /// Update step with the wall-clock delta since the previous update.
    ///
    /// Time spent in initialization and resize is not counted.
    pub fn update(&mut self, keys: DirectionalInput) -> EngineResult<bool> {
        self.pipeline.update_at(Instant::now(), keys)
    }

    /// Update step with an explicit delta in seconds. The engine clock is not
    /// ticked.
    pub fn update_with_delta(&mut self, dt: f32, keys: DirectionalInput) -> EngineResult<bool> {
        self.pipeline.update(dt, keys)
    }

    /// Draws one frame. Returns `FrameStatus::Skipped` when the surface had no
    /// back buffer to give (minimized or occluded window).
    pub fn render(&mut self) -> EngineResult<FrameStatus> {
        self.pipeline.render()
    }

    /// Waits for the GPU, then resizes the surface, depth target and projection.
    /// Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pipeline.resize(width, height)
    }

    /// Waits for outstanding GPU work and releases the fence. Idempotent.
    pub fn shutdown(&mut self) -> EngineResult<()> {
        self.pipeline.shutdown()
    }

    /// Slot the next `update` writes.
    pub fn frame_index(&self) -> usize {
        self.pipeline.frame_index()
    }

    /// Value the next fence signal will use.
    pub fn fence_value(&self) -> u64 {
        self.pipeline.gate().next_value()
    }

    pub fn completed_fence_value(&self) -> u64 {
        self.pipeline.gate().completed_value()
    }

    /// Timing of the last `update`.
    pub fn last_tick(&self) -> Option<FrameTime> {
        self.pipeline.last_tick()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.pipeline.frames_rendered()
    }

    pub fn state(&self) -> PipelineState {
        self.pipeline.state()
    }

    pub fn transform(&self) -> &TransformState {
        self.pipeline.transform()
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        self.pipeline.backend().gpu()
    }
}

impl Drop for Engine<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.shutdown() {
            log::error!("engine shutdown failed: {e}");
        }
    }
}
