use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::error::{EngineError, EngineResult};

use super::surface;
use super::{GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires back buffers, recovering from lost/outdated surfaces once
pub struct Gpu<'w> {
    /// Kept alive for the surface.
    _instance: wgpu::Instance,

    /// Surface bound to the native window; the window must outlive it.
    surface: wgpu::Surface<'w>,

    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    config: wgpu::SurfaceConfiguration,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a native window.
    ///
    /// `width`/`height` are the drawable size in physical pixels. Adapter and
    /// device acquisition is asynchronous under wgpu.
    pub async fn new<W>(target: &'w W, width: u32, height: u32, init: GpuInit) -> EngineResult<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Sync,
    {
        if width == 0 || height == 0 {
            return Err(EngineError::SurfaceCreation(format!(
                "drawable size {width}x{height} is empty"
            )));
        }

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
            allow_software_adapter,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| EngineError::SurfaceCreation(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| EngineError::AdapterUnavailable(e.to_string()))?;

        let info = adapter.get_info();
        if !surface::adapter_acceptable(info.device_type, allow_software_adapter) {
            return Err(EngineError::AdapterUnavailable(format!(
                "only a software adapter is available ({})",
                info.name
            )));
        }
        log::info!("adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("spindle-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| EngineError::DeviceCreation(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb).ok_or_else(|| {
            EngineError::SurfaceCreation("surface reports no supported formats".into())
        })?;
        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        log::info!("surface: {format:?}, {width}x{height}, {present_mode:?}, {alpha_mode:?}");

        Ok(Self {
            _instance: instance,
            surface,
            adapter,
            device,
            queue,
            config,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Configured drawable size (physical pixels).
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface. wgpu cannot configure a 0x0 surface, so zero
    /// sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next back buffer, retrying once after a recoverable error.
    ///
    /// `None` means the surface has no image to give right now (timeout, or
    /// still outdated after reconfiguring, as with a minimized window) and the
    /// frame should be skipped. A lost surface that does not come back after
    /// reconfiguring is an error.
    pub fn acquire(&self) -> EngineResult<Option<wgpu::SurfaceTexture>> {
        let err = match self.surface.get_current_texture() {
            Ok(texture) => return Ok(Some(texture)),
            Err(err) => err,
        };

        let action = self.handle_surface_error(&err);
        if !action.is_recoverable() {
            return Err(EngineError::Presentation(err.to_string()));
        }
        log::debug!("surface acquisition failed ({err}); {action:?}, retrying");

        match self.surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(err) if surface::is_transient(&err) => {
                log::debug!("surface still unavailable ({err}); skipping frame");
                Ok(None)
            }
            Err(err) => Err(EngineError::Presentation(err.to_string())),
        }
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, err)
    }
}
