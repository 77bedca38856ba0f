//! Cube geometry, shader programs and draw recording.
//!
//! The renderer owns everything that is fixed for the pipeline's lifetime
//! (pipeline, geometry, depth target). Per-frame constants live in
//! `frame` and are bound per slot.

mod cube;
mod renderer;

pub use cube::{CubeVertex, ShaderProgram, ShaderPrograms, CUBE_INDICES, CUBE_VERTICES};
pub use renderer::{CubeRenderer, DEPTH_FORMAT};
