use crate::device::GpuInit;
use crate::frame::SyncPolicy;
use crate::render::ShaderPrograms;
use crate::transform::{ColorConfig, TransformConfig};

/// Everything the engine needs besides the window.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Frame slots (sets of per-frame constants). Two means double buffering.
    pub frames_in_flight: usize,
    pub sync_policy: SyncPolicy,

    pub transform: TransformConfig,
    pub color: ColorConfig,
    /// Linear RGBA the back buffer is cleared to every frame.
    pub clear_color: [f32; 4],

    pub gpu: GpuInit,
    pub shaders: ShaderPrograms,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            sync_policy: SyncPolicy::FullDrain,
            transform: TransformConfig::default(),
            color: ColorConfig::default(),
            clear_color: [0.5, 0.5, 0.5, 1.0],
            gpu: GpuInit::default(),
            shaders: ShaderPrograms::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_double_buffer_with_full_drain() {
        let c = EngineConfig::default();
        assert_eq!(c.frames_in_flight, 2);
        assert_eq!(c.sync_policy, SyncPolicy::FullDrain);
        assert_eq!(c.clear_color, [0.5, 0.5, 0.5, 1.0]);
        assert!(!c.gpu.allow_software_adapter);
    }
}
