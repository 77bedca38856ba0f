use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::EngineConfig;
use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::engine::Engine;
use crate::input::platform::translate_window_event;
use crate::input::{InputEvent, InputState, PointerMoveEvent};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "spindle".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    SetTitle(String),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, initializes the engine on it and runs the event loop
    /// until the window closes or the app exits.
    ///
    /// Engine initialization failure is returned as an error.
    pub fn run<A>(window: RuntimeConfig, engine: EngineConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(window, engine, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,

    window: Window,

    // Invariant in 'this: the pipeline names the backend's associated types.
    #[borrows(window)]
    #[not_covariant]
    engine: Engine<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    window_config: RuntimeConfig,
    engine_config: EngineConfig,
    app: A,

    entry: Option<WindowEntry>,
    started: bool,
    exit_requested: bool,
    /// First unrecoverable error; returned from `Runtime::run`.
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(window_config: RuntimeConfig, engine_config: EngineConfig, app: A) -> Self {
        Self {
            window_config,
            engine_config,
            app,
            entry: None,
            started: false,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.close_window();
        self.request_exit(event_loop);
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(self.window_config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let config = self.engine_config.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            window,
            engine_builder: |w| {
                let size = w.inner_size();
                pollster::block_on(Engine::initialize(w, size.width, size.height, config))
            },
        }
        .try_build()
        .context("engine initialization failed")?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    /// Shuts the engine down and drops the window.
    fn close_window(&mut self) {
        if let Some(mut entry) = self.entry.take() {
            if let Err(e) = entry.with_engine_mut(|engine| engine.shutdown()) {
                log::error!("engine shutdown failed: {e}");
            }
        }
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        for cmd in ctx.commands {
            match cmd {
                Command::SetTitle(title) => {
                    if let Some(entry) = &self.entry {
                        entry.with_window(|w| w.set_title(&title));
                    }
                }
                Command::Exit => {
                    self.close_window();
                    self.request_exit(event_loop);
                }
            }
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw: the cube animates every frame. A minimized window
        // has nothing to draw into; the restoring resize requests a redraw.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| {
                if has_drawable_area(w) {
                    w.request_redraw();
                }
            });
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return };

        let mut app_control = AppControl::Continue;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(&event) {
                fields.input_state.apply_event(&ev);

                if let InputEvent::PointerMoved(PointerMoveEvent { x, y }) = ev {
                    let held = fields.input_state.rotation_modifier_held();
                    fields.engine.on_input(x, y, held);
                }
            }

            app_control = app.on_window_event(window_id, &event);
        });

        if app_control == AppControl::Exit {
            self.close_window();
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.close_window();
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(size) => {
                let (width, height) = (size.width, size.height);
                let resized = entry.with_engine_mut(|engine| engine.resize(width, height));
                match resized {
                    Ok(()) => entry.with_window(|w| w.request_redraw()),
                    Err(e) => {
                        let err = anyhow::Error::new(e).context("resize failed");
                        self.fail(event_loop, err);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if !entry.with_window(|w| has_drawable_area(w)) {
                    return;
                }

                let mut runtime_ctx = RuntimeCtx::default();

                entry.with_mut(|fields| {
                    let mut ctx = FrameCtx {
                        window: WindowCtx { id: window_id, window: fields.window },
                        engine: fields.engine,
                        input: fields.input_state,
                        runtime: &mut runtime_ctx,
                    };
                    app_control = app.on_frame(&mut ctx);
                });

                if app_control == AppControl::Exit {
                    runtime_ctx.exit();
                }
                self.apply_commands(event_loop, runtime_ctx);
            }

            _ => {}
        }
    }
}

fn has_drawable_area(window: &Window) -> bool {
    let size = window.inner_size();
    size.width > 0 && size.height > 0
}
