use winit::window::{Window, WindowId};

use crate::engine::Engine;
use crate::error::EngineResult;
use crate::frame::FrameStatus;
use crate::input::InputState;
use crate::window::RuntimeCtx;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Drawable size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window borrow carried by `Engine<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub engine: &'a mut Engine<'w>,
    pub input: &'a InputState,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// One update tick with the held keys, then one render.
    pub fn step(&mut self) -> EngineResult<FrameStatus> {
        self.engine.update(self.input.directional())?;
        self.window.window.pre_present_notify();
        self.engine.render()
    }
}
