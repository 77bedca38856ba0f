//! Transform state: camera, world/view/projection matrices and the animated
//! color multiplier.
//!
//! Pure CPU math. Nothing here touches the device.

mod camera;
mod color;
mod state;

pub use camera::{wrap_angle, CameraPose, DirectionalInput};
pub use color::{ColorAnimator, ColorConfig, WrapPolicy};
pub use state::{TransformConfig, TransformInput, TransformState};
