use std::time::Instant;

use crate::error::{EngineError, EngineResult};
use crate::input::MouseLook;
use crate::sync::{Fence, SyncGate};
use crate::time::{FrameClock, FrameTime};
use crate::transform::{ColorAnimator, DirectionalInput, TransformInput, TransformState};

use super::resources::{FrameResourceSet, SlotRegion};

/// Device side of the frame pipeline: command recording, submission, presentation.
pub trait FrameBackend {
    type Fence: Fence;
    type Region: SlotRegion;

    /// Resets per-frame recording state and records the frame, binding `slot`'s
    /// constants.
    ///
    /// Returns `false` when no back buffer is available right now (minimized or
    /// occluded window); nothing is recorded and the frame is skipped.
    fn record(&mut self, slot: usize) -> EngineResult<bool>;

    /// Submits the commands recorded by the last `record`.
    fn submit(&mut self) -> EngineResult<()>;

    /// Presents the frame and returns the back-buffer index the presentation
    /// layer now reports as current. It need not strictly alternate.
    fn present(&mut self) -> EngineResult<usize>;

    /// Back-buffer index before the first present.
    fn current_back_buffer(&self) -> usize;

    /// Recreates size-dependent targets. Only called with no GPU work in flight.
    fn resize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        let _ = (width, height);
        Ok(())
    }
}

/// When the CPU waits for the GPU.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SyncPolicy {
    /// Signal and wait after every submission. No CPU/GPU overlap.
    #[default]
    FullDrain,
    /// Signal after every submission; before writing a slot, wait only for the
    /// value signaled after that slot's last submission.
    PerSlot,
}

/// Outcome of one `render`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    Presented,
    /// No back buffer was available. Nothing was submitted and the fence did
    /// not advance.
    Skipped,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PipelineState {
    Uninitialized,
    Ready,
    Updating,
    Rendering,
    /// An operation failed; the pipeline refuses further work.
    Faulted,
    Destroyed,
}

impl PipelineState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Updating => "updating",
            Self::Rendering => "rendering",
            Self::Faulted => "faulted",
            Self::Destroyed => "destroyed",
        }
    }
}

/// Per-frame update and render orchestration over N frame slots.
///
/// `update` writes the current slot's constants; `render` records a draw that
/// binds that slot, submits, presents, synchronizes, then adopts the back-buffer
/// index reported by presentation. A slot is never written while a submission
/// that reads it may still be executing.
pub struct FramePipeline<B: FrameBackend> {
    backend: B,
    gate: SyncGate<B::Fence>,
    resources: FrameResourceSet<B::Region>,

    transform: TransformState,
    color: ColorAnimator,
    mouse: MouseLook,
    clock: FrameClock,
    last_tick: Option<FrameTime>,

    policy: SyncPolicy,
    /// Fence value covering each slot's last submission (0 = never submitted).
    slot_fences: Vec<u64>,
    frame_index: usize,
    frames_rendered: u64,
    state: PipelineState,
}

impl<B: FrameBackend> FramePipeline<B> {
    pub fn new(
        backend: B,
        fence: B::Fence,
        resources: FrameResourceSet<B::Region>,
        transform: TransformState,
        color: ColorAnimator,
        policy: SyncPolicy,
    ) -> Self {
        let slots = resources.slot_count();
        Self {
            backend,
            gate: SyncGate::new(fence),
            resources,
            transform,
            color,
            mouse: MouseLook::new(),
            clock: FrameClock::new(),
            last_tick: None,
            policy,
            slot_fences: vec![0; slots],
            frame_index: 0,
            frames_rendered: 0,
            state: PipelineState::Uninitialized,
        }
    }

    /// Drains the one-time setup work and adopts the initial back buffer.
    pub fn initialize(&mut self) -> EngineResult<()> {
        self.enter(PipelineState::Uninitialized, PipelineState::Ready, "initialize")?;
        self.guarded(|p| {
            let value = p.gate.signal_and_wait()?;
            p.frame_index = p.backend.current_back_buffer() % p.slot_count();
            log::debug!(
                "frame pipeline ready: {} slots, {:?}, initial drain at fence {value}",
                p.slot_count(),
                p.policy
            );
            Ok(())
        })?;
        // The first delta starts here, not at construction.
        self.clock.reset();
        self.state = PipelineState::Ready;
        Ok(())
    }

    /// Feeds an absolute pointer position. Movement counts toward rotation only
    /// while the modifier is held.
    pub fn on_input(&mut self, x: f32, y: f32, modifier_held: bool) {
        self.mouse.on_pointer(x, y, modifier_held);
    }

    /// Update step timed by the pipeline's clock: the delta is the time since the
    /// previous tick, initialization or resize, whichever came last.
    pub fn update_at(&mut self, now: Instant, keys: DirectionalInput) -> EngineResult<bool> {
        let tick = self.clock.tick_at(now);
        self.last_tick = Some(tick);
        self.update(tick.dt, keys)
    }

    /// Advances animation and camera by `dt` seconds and writes the current slot.
    ///
    /// Returns whether the view changed. The pointer delta is consumed whether
    /// or not it moved the camera.
    pub fn update(&mut self, dt: f32, keys: DirectionalInput) -> EngineResult<bool> {
        self.enter(PipelineState::Ready, PipelineState::Updating, "update")?;
        let changed = self.guarded(|p| {
            let slot = p.frame_index;
            if p.policy == SyncPolicy::PerSlot {
                p.gate.wait_for(p.slot_fences[slot])?;
            }

            let color = p.color.advance(dt);
            let input = TransformInput { keys, mouse_delta: p.mouse.take_delta() };
            let changed = p.transform.update(dt, &input);

            p.resources.write(slot, &color, &p.transform.wvp());
            Ok(changed)
        })?;
        self.state = PipelineState::Ready;
        Ok(changed)
    }

    /// Records, submits and presents one frame, then synchronizes and advances
    /// to the reported back buffer.
    ///
    /// A skipped frame leaves the fence, the slot index and the frame count
    /// untouched.
    pub fn render(&mut self) -> EngineResult<FrameStatus> {
        self.enter(PipelineState::Ready, PipelineState::Rendering, "render")?;
        let status = self.guarded(|p| {
            let slot = p.frame_index;

            if !p.backend.record(slot)? {
                log::debug!("no back buffer for slot {slot}; frame skipped");
                return Ok(FrameStatus::Skipped);
            }
            p.backend.submit()?;
            let back_buffer = p.backend.present()?;

            match p.policy {
                SyncPolicy::FullDrain => {
                    p.slot_fences[slot] = p.gate.signal_and_wait()?;
                }
                SyncPolicy::PerSlot => {
                    p.slot_fences[slot] = p.gate.signal()?;
                }
            }

            p.frame_index = back_buffer % p.slot_count();
            p.frames_rendered += 1;
            log::trace!(
                "frame {} on slot {slot} fenced at {}; next slot {}",
                p.frames_rendered,
                p.slot_fences[slot],
                p.frame_index
            );
            Ok(FrameStatus::Presented)
        })?;
        self.state = PipelineState::Ready;
        Ok(status)
    }

    /// Waits for all submitted GPU work outside the frame cycle.
    pub fn drain(&mut self) -> EngineResult<u64> {
        self.enter(PipelineState::Ready, PipelineState::Ready, "drain")?;
        self.guarded(|p| p.gate.signal_and_wait())
    }

    /// Drains, then recreates size-dependent targets and the projection.
    pub fn resize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        self.enter(PipelineState::Ready, PipelineState::Ready, "resize")?;
        self.guarded(|p| {
            p.gate.signal_and_wait()?;
            p.backend.resize(width, height)?;
            p.transform.set_aspect(width, height);
            p.clock.reset();
            Ok(())
        })
    }

    /// Drains outstanding work (when possible) and releases the fence.
    ///
    /// Idempotent. The fence is released even if the final drain fails.
    pub fn shutdown(&mut self) -> EngineResult<()> {
        if self.state == PipelineState::Destroyed {
            return Ok(());
        }

        let drained = if self.state == PipelineState::Ready {
            self.gate.signal_and_wait().map(|_| ())
        } else {
            Ok(())
        };

        self.gate.release();
        self.state = PipelineState::Destroyed;
        log::debug!(
            "frame pipeline destroyed after {} frames, fence at {}",
            self.frames_rendered,
            self.gate.completed_value()
        );
        drained
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[inline]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.resources.slot_count()
    }

    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Timing of the last clocked update.
    #[inline]
    pub fn last_tick(&self) -> Option<FrameTime> {
        self.last_tick
    }

    #[inline]
    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn gate(&self) -> &SyncGate<B::Fence> {
        &self.gate
    }

    pub fn resources(&self) -> &FrameResourceSet<B::Region> {
        &self.resources
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn color(&self) -> &ColorAnimator {
        &self.color
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn enter(
        &mut self,
        expected: PipelineState,
        next: PipelineState,
        operation: &'static str,
    ) -> EngineResult<()> {
        match self.state {
            s if s == expected => {
                self.state = next;
                Ok(())
            }
            PipelineState::Faulted => Err(EngineError::Faulted),
            s => Err(EngineError::InvalidState { operation, state: s.name() }),
        }
    }

    /// Runs `f`; any error leaves the pipeline faulted.
    fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> EngineResult<T>) -> EngineResult<T> {
        let result = f(self);
        if let Err(e) = &result {
            log::error!("{} failed: {e}", e.operation());
            self.state = PipelineState::Faulted;
        }
        result
    }
}
