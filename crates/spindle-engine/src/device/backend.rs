use crate::error::{EngineError, EngineResult};
use crate::frame::{FrameBackend, FrameResourceSet, UniformRegion};
use crate::render::CubeRenderer;
use crate::sync::QueueFence;

use super::Gpu;

/// `FrameBackend` drawing the cube into a wgpu surface.
///
/// wgpu does not expose the swapchain image index, so the back buffer
/// reported after each present is the present count modulo the slot count.
pub struct SurfaceBackend<'w> {
    gpu: Gpu<'w>,
    renderer: CubeRenderer,
    /// One bind group per frame slot.
    slot_bindings: Vec<wgpu::BindGroup>,

    recorded: Option<(wgpu::SurfaceTexture, wgpu::CommandBuffer)>,
    submitted: Option<wgpu::SurfaceTexture>,
    presents: usize,
}

impl<'w> SurfaceBackend<'w> {
    pub fn new(gpu: Gpu<'w>, renderer: CubeRenderer, resources: &FrameResourceSet<UniformRegion>) -> Self {
        let slot_bindings = (0..resources.slot_count())
            .map(|i| {
                let slot = resources.slot(i);
                renderer.bind_slot(gpu.device(), i, slot.color.buffer(), slot.wvp.buffer())
            })
            .collect();

        Self {
            gpu,
            renderer,
            slot_bindings,
            recorded: None,
            submitted: None,
            presents: 0,
        }
    }

    /// Fence over this backend's queue.
    pub fn fence(&self) -> QueueFence {
        QueueFence::new(self.gpu.device().clone(), self.gpu.queue().clone())
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    fn slots(&self) -> usize {
        self.slot_bindings.len()
    }
}

impl FrameBackend for SurfaceBackend<'_> {
    type Fence = QueueFence;
    type Region = UniformRegion;

    fn record(&mut self, slot: usize) -> EngineResult<bool> {
        // A frame abandoned after a failure is dropped here, unpresented.
        self.recorded = None;

        let bindings = self.slot_bindings.get(slot).ok_or_else(|| {
            EngineError::Submission(format!("slot {slot} out of range ({} slots)", self.slots()))
        })?;

        let Some(texture) = self.gpu.acquire()? else {
            return Ok(false);
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("spindle frame encoder"),
            });
        self.renderer.encode(&mut encoder, &view, bindings);

        self.recorded = Some((texture, encoder.finish()));
        Ok(true)
    }

    fn submit(&mut self) -> EngineResult<()> {
        let (texture, commands) = self
            .recorded
            .take()
            .ok_or_else(|| EngineError::Submission("no recorded frame to submit".into()))?;

        self.gpu.queue().submit(std::iter::once(commands));
        self.submitted = Some(texture);
        Ok(())
    }

    fn present(&mut self) -> EngineResult<usize> {
        let texture = self
            .submitted
            .take()
            .ok_or_else(|| EngineError::Presentation("no submitted frame to present".into()))?;

        texture.present();
        self.presents = self.presents.wrapping_add(1);
        Ok(self.current_back_buffer())
    }

    fn current_back_buffer(&self) -> usize {
        self.presents % self.slots().max(1)
    }

    fn resize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        self.gpu.resize(width, height);
        self.renderer.resize(self.gpu.device(), width, height);
        Ok(())
    }
}
