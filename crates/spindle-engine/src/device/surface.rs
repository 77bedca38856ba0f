use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Whether an adapter passes the selection rule.
pub(crate) fn adapter_acceptable(device_type: wgpu::DeviceType, allow_software: bool) -> bool {
    allow_software || device_type != wgpu::DeviceType::Cpu
}

/// Classifies an acquisition error, reconfiguring the surface when that can
/// recover it.
pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    err: &wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            surface.configure(device, config);
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::Retry,
        wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other => SurfaceErrorAction::Fatal,
    }
}

/// Errors that clear up on their own: the surface exists but has no image to
/// hand out yet.
pub(crate) fn is_transient(err: &wgpu::SurfaceError) -> bool {
    matches!(err, wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Outdated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes,
            ..Default::default()
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn srgb_is_preferred_when_offered() {
        let c = caps(
            vec![wgpu::TextureFormat::Rgba8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            vec![],
        );
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Rgba8Unorm));
    }

    #[test]
    fn no_formats_means_no_surface() {
        assert_eq!(choose_surface_format(&caps(vec![], vec![]), true), None);
    }

    // ── adapter ───────────────────────────────────────────────────────────

    #[test]
    fn software_adapters_need_opt_in() {
        assert!(!adapter_acceptable(wgpu::DeviceType::Cpu, false));
        assert!(adapter_acceptable(wgpu::DeviceType::Cpu, true));
        assert!(adapter_acceptable(wgpu::DeviceType::DiscreteGpu, false));
        assert!(adapter_acceptable(wgpu::DeviceType::IntegratedGpu, false));
    }

    // ── alpha ─────────────────────────────────────────────────────────────

    #[test]
    fn unsupported_alpha_falls_back_to_first() {
        let c = caps(vec![], vec![wgpu::CompositeAlphaMode::PreMultiplied]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::Opaque)),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }

    // ── acquisition errors ────────────────────────────────────────────────

    #[test]
    fn minimized_window_errors_skip_the_frame() {
        assert!(is_transient(&wgpu::SurfaceError::Timeout));
        assert!(is_transient(&wgpu::SurfaceError::Outdated));
        assert!(!is_transient(&wgpu::SurfaceError::Lost));
        assert!(!is_transient(&wgpu::SurfaceError::OutOfMemory));
        assert!(!is_transient(&wgpu::SurfaceError::Other));
    }
}
