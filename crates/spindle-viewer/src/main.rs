use anyhow::Result;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use spindle_engine::core::{App, AppControl, FrameCtx};
use spindle_engine::frame::FrameStatus;
use spindle_engine::logging::{init_logging, LoggingConfig};
use spindle_engine::window::{Runtime, RuntimeConfig};
use spindle_engine::EngineConfig;

const TITLE: &str = "spindle";

/// Drives one update and one render per redraw; Escape quits.
#[derive(Default)]
struct Viewer {
    frames: u32,
    elapsed: f32,
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        match ctx.step() {
            Ok(FrameStatus::Presented) => self.frames += 1,
            Ok(FrameStatus::Skipped) => {}
            Err(e) => {
                let err = anyhow::Error::new(e).context("frame failed");
                log::error!("{err:#}");
                return AppControl::Exit;
            }
        }

        self.elapsed += ctx.engine.last_tick().map_or(0.0, |t| t.dt);
        if self.elapsed >= 1.0 {
            let fps = self.frames as f32 / self.elapsed;
            ctx.runtime.set_title(format!("{TITLE} | {fps:.0} fps | fence {}", ctx.engine.fence_value()));
            self.frames = 0;
            self.elapsed = 0.0;
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let window = RuntimeConfig { title: TITLE.to_string(), ..Default::default() };
    Runtime::run(window, EngineConfig::default(), Viewer::default())
}
