use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Constant-buffer granularity of the reference hardware model.
pub const CONSTANT_BUFFER_ALIGNMENT: u64 = 256;

/// Rounds `size` up to the next multiple of `alignment` (a power of two).
#[inline]
pub const fn aligned_size(size: u64, alignment: u64) -> u64 {
    debug_assert!(alignment.is_power_of_two());
    (size + alignment - 1) & !(alignment - 1)
}

/// Per-frame color multiplier (binding 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ColorMultiplier {
    pub value: [f32; 4],
}

impl ColorMultiplier {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { value: [r, g, b, a] }
    }
}

/// World-view-projection matrix in GPU layout (binding 1).
///
/// The shader reads four column vectors, i.e. the transpose of the row-major
/// matrix the CPU math composes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct WvpConstants {
    pub matrix: [[f32; 4]; 4],
}

impl WvpConstants {
    pub fn from_matrix(m: &Mat4) -> Self {
        Self { matrix: m.to_cols_array_2d() }
    }

    /// Reads the constants back as a CPU matrix.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.matrix)
    }
}

impl Default for WvpConstants {
    fn default() -> Self {
        Self::from_matrix(&Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── alignment ─────────────────────────────────────────────────────────

    #[test]
    fn color_and_wvp_round_up_to_256() {
        let color = std::mem::size_of::<ColorMultiplier>() as u64;
        let wvp = std::mem::size_of::<WvpConstants>() as u64;
        assert_eq!(color, 16);
        assert_eq!(wvp, 64);
        assert_eq!(aligned_size(color, CONSTANT_BUFFER_ALIGNMENT), 256);
        assert_eq!(aligned_size(wvp, CONSTANT_BUFFER_ALIGNMENT), 256);
    }

    #[test]
    fn exact_multiples_are_unchanged() {
        assert_eq!(aligned_size(256, 256), 256);
        assert_eq!(aligned_size(512, 256), 512);
        assert_eq!(aligned_size(257, 256), 512);
        assert_eq!(aligned_size(0, 256), 0);
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn wvp_bytes_are_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let c = WvpConstants::from_matrix(&m);
        // Translation lives in the fourth column, which is the last 16 bytes.
        assert_eq!(c.matrix[3], [1.0, 2.0, 3.0, 1.0]);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&c));
        assert_eq!(&floats[12..16], &[1.0, 2.0, 3.0, 1.0]);
        assert_eq!(c.to_matrix(), m);
    }
}
