use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};

// ── vertex ────────────────────────────────────────────────────────────────

/// Tightly packed position + color vertex (28-byte stride).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl CubeVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, z: f32, color: [f32; 4]) -> Self {
        Self { position: [x, y, z], color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── geometry ──────────────────────────────────────────────────────────────

const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Unit cube centered on the origin. Vertices 0..4 are the z = -0.5 face,
/// 4..8 the z = +0.5 face, both wound (-,-) (+,-) (+,+) (-,+).
pub const CUBE_VERTICES: [CubeVertex; 8] = [
    CubeVertex::new(-0.5, -0.5, -0.5, BLUE),
    CubeVertex::new(0.5, -0.5, -0.5, BLUE),
    CubeVertex::new(0.5, 0.5, -0.5, BLUE),
    CubeVertex::new(-0.5, 0.5, -0.5, BLUE),
    CubeVertex::new(-0.5, -0.5, 0.5, BLUE),
    CubeVertex::new(0.5, -0.5, 0.5, BLUE),
    CubeVertex::new(0.5, 0.5, 0.5, BLUE),
    CubeVertex::new(-0.5, 0.5, 0.5, BLUE),
];

/// Twelve triangles, two per face.
pub const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // -z
    4, 7, 6, 4, 6, 5, // +z
    0, 3, 7, 0, 7, 4, // -x
    1, 6, 2, 1, 5, 6, // +x
    3, 6, 7, 3, 2, 6, // +y
    0, 4, 5, 0, 5, 1, // -y
];

// ── shaders ───────────────────────────────────────────────────────────────

/// One WGSL program and the entry point to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub source: Cow<'static, str>,
    pub entry_point: Cow<'static, str>,
}

/// Vertex and pixel programs used by the cube pipeline.
///
/// Both must agree on the bind group layout: binding 0 is the color
/// multiplier, binding 1 the WVP matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPrograms {
    pub vertex: ShaderProgram,
    pub pixel: ShaderProgram,
}

impl Default for ShaderPrograms {
    fn default() -> Self {
        let source = Cow::Borrowed(include_str!("shaders/cube.wgsl"));
        Self {
            vertex: ShaderProgram { source: source.clone(), entry_point: Cow::Borrowed("vs_main") },
            pixel: ShaderProgram { source, entry_point: Cow::Borrowed("fs_main") },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<CubeVertex>(), 28);
        assert_eq!(CubeVertex::layout().array_stride, 28);
    }

    #[test]
    fn indices_reference_every_vertex() {
        let mut used = [false; 8];
        for i in CUBE_INDICES {
            used[i as usize] = true;
        }
        assert!(used.iter().all(|u| *u));
    }

    #[test]
    fn each_face_is_planar() {
        // Both triangles of a face share one constant coordinate.
        for face in CUBE_INDICES.chunks(6) {
            let axis = (0..3).find(|&a| {
                let v = CUBE_VERTICES[face[0] as usize].position[a];
                face.iter().all(|&i| CUBE_VERTICES[i as usize].position[a] == v)
            });
            assert!(axis.is_some(), "face {face:?} is not axis aligned");
        }
    }

    #[test]
    fn default_programs_share_the_built_in_source() {
        let p = ShaderPrograms::default();
        assert_eq!(p.vertex.source, p.pixel.source);
        assert!(p.vertex.source.contains("fn vs_main"));
        assert!(p.pixel.source.contains("fn fs_main"));
    }
}
