//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform` translates window-system events into `InputEvent`s.

mod pointer;
mod state;
mod types;
pub mod platform;

pub use pointer::MouseLook;
pub use state::{InputState, ROTATION_MODIFIER};
pub use types::{
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};
